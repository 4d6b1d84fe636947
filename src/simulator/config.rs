//! Simulation configuration.

use crate::core::config::EngineConfig;
use crate::passives::PlayerClass;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Kills per run before giving up on reaching the target level
    pub max_kills_per_run: u64,

    /// Stop a run once the player reaches this level
    pub target_level: u32,

    /// A boss spawns every this many kills (0 = never)
    pub boss_interval: u64,

    /// Class picked at the start of every run
    pub class: PlayerClass,

    /// Spend passive points as soon as they are earned
    pub auto_allocate: bool,

    /// Engine tunables used for every run
    pub engine: EngineConfig,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,

    /// Write the last run's world and player stores through `SaveFile::for_config`
    pub save_last_run: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 200,
            seed: None,
            max_kills_per_run: 50_000,
            target_level: 30,
            boss_interval: 250,
            class: PlayerClass::Melee,
            auto_allocate: true,
            engine: EngineConfig::default(),
            verbosity: 1,
            save_last_run: false,
        }
    }
}

impl SimConfig {
    /// Quick config for checking early-game pacing
    pub fn quick(target_level: u32) -> Self {
        Self {
            num_runs: 50,
            target_level,
            ..Default::default()
        }
    }

    /// Every run goes all the way to the level cap
    pub fn full_progression() -> Self {
        Self {
            num_runs: 20,
            target_level: crate::core::constants::MAX_PLAYER_LEVEL,
            max_kills_per_run: 500_000,
            ..Default::default()
        }
    }

    /// Many short runs for rarity and modifier frequencies
    pub fn encounter_analysis(num_runs: u32) -> Self {
        Self {
            num_runs,
            target_level: 10,
            boss_interval: 50,
            ..Default::default()
        }
    }
}

//! Runtime tunables for the progression engine.

use super::constants::*;
use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engine configuration. Every field falls back to its default when absent
/// from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Players within this distance of a dying enemy share its XP
    pub xp_award_radius: f32,

    /// Chance an enemy's level lands near the world level
    pub enemy_level_near_chance: f64,

    /// Spread (either side) of the near-world-level roll
    pub enemy_level_near_spread: i64,

    /// Inclusive offset range above world level for the far roll
    pub enemy_level_far_offset: (i64, i64),

    /// Inclusive range sampled by `WorldState::apply_random_variance`
    pub variance_roll_range: (f64, f64),

    /// Extra directory of `*.json` tree definitions loaded after the built-ins
    pub tree_directory: Option<PathBuf>,

    /// Overrides the platform save directory
    pub save_directory: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            xp_award_radius: XP_AWARD_RADIUS,
            enemy_level_near_chance: ENEMY_LEVEL_NEAR_CHANCE,
            enemy_level_near_spread: ENEMY_LEVEL_NEAR_SPREAD,
            enemy_level_far_offset: (ENEMY_LEVEL_FAR_MIN_OFFSET, ENEMY_LEVEL_FAR_MAX_OFFSET),
            variance_roll_range: (DEFAULT_VARIANCE_ROLL_MIN, DEFAULT_VARIANCE_ROLL_MAX),
            tree_directory: None,
            save_directory: None,
        }
    }
}

impl EngineConfig {
    /// Enemies always spawn exactly at world level. Handy for deterministic balancing.
    pub fn flat_enemy_levels() -> Self {
        Self {
            enemy_level_near_chance: 1.0,
            enemy_level_near_spread: 0,
            ..Default::default()
        }
    }

    /// Config for a co-op session where XP is shared across a wider area.
    pub fn wide_xp_sharing(radius: f32) -> Self {
        Self {
            xp_award_radius: radius,
            ..Default::default()
        }
    }

    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Load a config from a JSON file on disk.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// `enemy_level_near_chance` as a valid probability. NaN falls back to the default.
    pub fn near_level_probability(&self) -> f64 {
        if self.enemy_level_near_chance.is_nan() {
            ENEMY_LEVEL_NEAR_CHANCE
        } else {
            self.enemy_level_near_chance.clamp(0.0, 1.0)
        }
    }

    /// Swap inverted ranges and clamp probabilities so the rolls stay well defined.
    fn sanitized(mut self) -> Self {
        self.enemy_level_near_chance = self.near_level_probability();
        self.enemy_level_near_spread = self.enemy_level_near_spread.saturating_abs();
        let (lo, hi) = self.enemy_level_far_offset;
        self.enemy_level_far_offset = (lo.min(hi), lo.max(hi));
        let (lo, hi) = self.variance_roll_range;
        self.variance_roll_range = (lo.min(hi), lo.max(hi));
        if !self.xp_award_radius.is_finite() || self.xp_award_radius < 0.0 {
            self.xp_award_radius = XP_AWARD_RADIUS;
        }
        self
    }
}

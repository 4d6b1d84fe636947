//! Main simulation runner driving the real engine hooks.
//!
//! Each run loads a fresh world, spawns enemies through `on_spawn` and kills
//! them through `on_kill`, so XP, rarity and modifier numbers match what a
//! host would see. Statistics are gathered from the returned events.

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::engine::{EngineEvent, PlayerCharacter, ProgressionEngine};
use crate::enemy::{Enemy, PlayerId, PlayerTarget, Vec2};
use crate::persistence::{MemoryStore, SaveFile};
use std::io;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Regular enemies the simulated player farms: name, life, damage, defense.
const BESTIARY: [(&str, i32, i32, i32); 5] = [
    ("Green Slime", 14, 6, 0),
    ("Zombie", 45, 14, 6),
    ("Demon Eye", 60, 18, 2),
    ("Skeleton", 60, 20, 8),
    ("Hornet", 50, 26, 12),
];

pub const SIM_WORLD_SAVE: &str = "world.dat";
pub const SIM_PLAYER_SAVE: &str = "player.dat";

const SIM_BOSS: (&str, &str, i32, i32, i32) = ("Eye of Cthulhu", "eye_of_cthulhu", 2800, 15, 12);

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let engine_template = ProgressionEngine::new(config.engine.clone());
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let (run, stores) = simulate_single_run(config, &engine_template, &mut rng);
        if config.save_last_run && run_idx + 1 == config.num_runs {
            if let Err(e) = save_run(config, &stores) {
                tracing::error!(error = %e, "failed to save final run");
            }
        }
        if config.verbosity >= 2 {
            tracing::info!(
                run = run_idx + 1,
                of = config.num_runs,
                level = run.final_level,
                kills = run.total_kills,
                world_level = run.final_world_level,
                "run finished"
            );
        }
        all_runs.push(run);
    }

    SimReport::from_runs(all_runs, config.target_level)
}

/// The world and player stores a run leaves behind.
struct RunStores {
    world: MemoryStore,
    player: MemoryStore,
}

/// Write a run's stores to `world.dat` and `player.dat` in the configured save directory.
fn save_run(config: &SimConfig, stores: &RunStores) -> io::Result<()> {
    let world = SaveFile::for_config(&config.engine, SIM_WORLD_SAVE)?;
    world.save(&stores.world)?;
    let player = SaveFile::for_config(&config.engine, SIM_PLAYER_SAVE)?;
    player.save(&stores.player)?;
    tracing::info!(world = %world.path().display(), player = %player.path().display(), "saved final run");
    Ok(())
}

fn simulate_single_run(
    config: &SimConfig,
    template: &ProgressionEngine,
    rng: &mut ChaCha8Rng,
) -> (RunStats, RunStores) {
    let mut engine = ProgressionEngine::with_registry(config.engine.clone(), template.registry().clone());
    let mut world_store = MemoryStore::new();
    let mut player_store = MemoryStore::new();
    engine.on_level_load(&world_store);
    engine.roll_world_variance(rng);

    let player_id = PlayerId(0);
    let mut players = vec![engine.on_player_initialize(player_id, &player_store)];
    players[0].select_class(config.class, &mut player_store);
    let target = PlayerTarget::new(player_id, Vec2::ZERO);

    let mut stats = RunStats::new();

    while stats.total_kills < config.max_kills_per_run
        && players[0].progress().level() < config.target_level
    {
        let mut enemy = next_enemy(config, stats.total_kills, rng);
        let Some(state) = engine.on_spawn(&mut enemy, &[target], rng) else {
            tracing::warn!(enemy = %enemy.base_name, "simulated enemy is not eligible, stopping run");
            break;
        };

        stats.record_spawn(state.rarity(), state.modifiers().iter().map(|m| m.prefix()));
        let events = engine.on_kill(&enemy, &state, &[target], &mut players);
        stats.total_kills += 1;

        for event in &events {
            match event {
                EngineEvent::XpAwarded { amount, .. } => stats.total_xp += amount,
                EngineEvent::LevelUp { new_level, .. } => {
                    stats.record_level(*new_level);
                    if config.auto_allocate {
                        stats.points_spent += spend_points(&engine, &mut players[0], &mut player_store);
                    }
                }
                EngineEvent::BossDefeated { .. } => stats.boss_kills += 1,
                EngineEvent::Modifier(_) => {}
            }
        }
    }

    engine.on_player_save(&players[0], &mut player_store);
    let final_world_level = engine.world().map(|w| w.level()).unwrap_or(1);
    engine.on_level_unload(&mut world_store);

    stats.final_level = players[0].progress().level();
    stats.final_world_level = final_world_level;
    stats.reached_target = stats.final_level >= config.target_level;
    let stores = RunStores {
        world: world_store,
        player: player_store,
    };
    (stats, stores)
}

fn next_enemy(config: &SimConfig, kills: u64, rng: &mut impl Rng) -> Enemy {
    if config.boss_interval > 0 && kills > 0 && kills % config.boss_interval == 0 {
        let (name, id, life, damage, defense) = SIM_BOSS;
        return Enemy::new(name, life, damage, defense).as_boss(id);
    }
    let (name, life, damage, defense) = BESTIARY[rng.gen_range(0..BESTIARY.len())];
    Enemy::new(name, life, damage, defense).at(Vec2::new(rng.gen_range(-600.0..600.0), 0.0))
}

/// Greedy spend: keep buying the first affordable node of the class tree.
fn spend_points(engine: &ProgressionEngine, player: &mut PlayerCharacter, store: &mut MemoryStore) -> u32 {
    let Some(tree) = player.class().tree_id().and_then(|id| engine.registry().get_tree(id)) else {
        return 0;
    };
    let mut spent = 0;
    loop {
        let next = tree
            .nodes()
            .find(|node| player.can_allocate(engine.registry(), tree.id(), &node.id))
            .map(|node| (node.id.clone(), node.upgrade_cost(player.allocations().node_tier(tree.id(), &node.id))));
        let Some((node_id, cost)) = next else {
            break;
        };
        if !player.allocate(engine.registry(), tree.id(), &node_id, store) {
            break;
        }
        spent += cost;
    }
    spent
}

//! The progression engine and the lifecycle hooks a host calls into.

use super::events::EngineEvent;
use super::player::PlayerCharacter;
use crate::core::config::EngineConfig;
use crate::enemy::{initialize_enemy, BossKillTracker, Enemy, EnemyState, PlayerId, PlayerTarget};
use crate::leveling::{add_xp, LevelUpReport};
use crate::passives::TreeRegistry;
use crate::persistence::KvStore;
use crate::rewards::{award_xp_to_player, compute_kill_reward};
use crate::world::{apply_random_variance, load_world_state, save_world_state, WorldState};
use rand::Rng;

/// Per-world state that exists between level load and unload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldSession {
    pub world: WorldState,
    pub bosses: BossKillTracker,
}

impl WorldSession {
    pub fn load_from(store: &impl KvStore) -> Self {
        Self {
            world: load_world_state(store),
            bosses: BossKillTracker::load_from(store),
        }
    }

    pub fn save_to(&self, store: &mut impl KvStore) {
        save_world_state(&self.world, store);
        self.bosses.save_to(store);
    }
}

/// Owns the config, the tree registry and the loaded world.
///
/// Hooks that need a world do nothing until [`on_level_load`](Self::on_level_load)
/// has run.
#[derive(Debug)]
pub struct ProgressionEngine {
    config: EngineConfig,
    registry: TreeRegistry,
    session: Option<WorldSession>,
}

impl ProgressionEngine {
    /// Build an engine and load the built-in trees plus any configured
    /// tree directory.
    pub fn new(config: EngineConfig) -> Self {
        let mut registry = TreeRegistry::with_builtin_trees();
        if let Some(dir) = &config.tree_directory {
            registry.add_directory(dir);
        }
        registry.load_all();
        Self::with_registry(config, registry)
    }

    /// Use an already loaded registry.
    pub fn with_registry(config: EngineConfig, registry: TreeRegistry) -> Self {
        Self {
            config,
            registry,
            session: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &TreeRegistry {
        &self.registry
    }

    /// Reload every tree source. Existing allocations keep their tiers and
    /// player caches catch up on their next `per_tick_stat_reset`.
    pub fn reload_trees(&mut self) -> usize {
        self.registry.reload_all()
    }

    pub fn session(&self) -> Option<&WorldSession> {
        self.session.as_ref()
    }

    pub fn world(&self) -> Option<&WorldState> {
        self.session.as_ref().map(|s| &s.world)
    }

    /// Admin access to the loaded world.
    pub fn world_mut(&mut self) -> Option<&mut WorldState> {
        self.session.as_mut().map(|s| &mut s.world)
    }

    pub fn is_level_loaded(&self) -> bool {
        self.session.is_some()
    }

    // ── World lifecycle ─────────────────────────────────────────

    pub fn on_level_load(&mut self, store: &impl KvStore) {
        let session = WorldSession::load_from(store);
        tracing::info!(
            world_level = session.world.level(),
            variance = session.world.variance(),
            bosses_defeated = session.bosses.defeated_count(),
            "world loaded"
        );
        self.session = Some(session);
    }

    pub fn save_world(&self, store: &mut impl KvStore) {
        if let Some(session) = &self.session {
            session.save_to(store);
        }
    }

    /// Save the world and drop it. Hooks are inert until the next load.
    pub fn on_level_unload(&mut self, store: &mut impl KvStore) {
        if let Some(session) = self.session.take() {
            session.save_to(store);
            tracing::info!(world_level = session.world.level(), "world unloaded");
        }
    }

    /// Roll a fresh world variance from the configured range. Returns the
    /// stored (clamped) value.
    pub fn roll_world_variance(&mut self, rng: &mut impl Rng) -> Option<f64> {
        let (min, max) = self.config.variance_roll_range;
        self.session
            .as_mut()
            .map(|s| apply_random_variance(&mut s.world, rng, min, max))
    }

    // ── Players ─────────────────────────────────────────────────

    pub fn on_player_initialize(&self, player: PlayerId, store: &impl KvStore) -> PlayerCharacter {
        PlayerCharacter::load(player, store, &self.registry)
    }

    pub fn on_player_save(&self, player: &PlayerCharacter, store: &mut impl KvStore) {
        player.save(store);
    }

    /// Start of a player's tick.
    pub fn per_tick_stat_reset(&self, player: &mut PlayerCharacter) {
        player.sync_passives(&self.registry);
        player.reset_stats();
    }

    /// After the host has added its own transient bonuses for the tick.
    pub fn per_tick_stat_apply(&self, player: &mut PlayerCharacter) {
        player.apply_stats();
    }

    /// Direct XP grant outside of kills (quests, admin commands).
    pub fn grant_xp(&mut self, player: &mut PlayerCharacter, amount: i64) -> Vec<EngineEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let report = add_xp(&mut player.progress, amount, &mut player.points, &mut session.world);
        xp_events(player, &report, session.world.level())
    }

    // ── Enemies ─────────────────────────────────────────────────

    pub fn on_spawn(
        &self,
        enemy: &mut Enemy,
        players: &[PlayerTarget],
        rng: &mut impl Rng,
    ) -> Option<EnemyState> {
        let session = self.session.as_ref()?;
        initialize_enemy(enemy, &session.world, &session.bosses, players, &self.config, rng)
    }

    /// A player's item or projectile hit the enemy.
    pub fn on_hit(&self, enemy: &mut Enemy, state: &EnemyState, attacker: &PlayerTarget) -> Vec<EngineEvent> {
        state
            .modifiers()
            .iter()
            .filter_map(|m| m.on_hit(enemy, attacker))
            .map(EngineEvent::Modifier)
            .collect()
    }

    pub fn per_tick_update(
        &self,
        enemy: &Enemy,
        state: &mut EnemyState,
        players: &[PlayerTarget],
    ) -> Vec<EngineEvent> {
        state
            .modifiers_mut()
            .iter_mut()
            .filter_map(|m| m.update(enemy, players))
            .map(EngineEvent::Modifier)
            .collect()
    }

    pub fn per_tick_life_regen(&self, enemy: &mut Enemy, state: &EnemyState) {
        for modifier in state.modifiers() {
            modifier.update_life_regen(enemy);
        }
    }

    /// Enemy death: modifier death effects, boss tracking and XP for every
    /// eligible player in range. `characters` are matched to `targets` by id.
    pub fn on_kill(
        &mut self,
        enemy: &Enemy,
        state: &EnemyState,
        targets: &[PlayerTarget],
        characters: &mut [PlayerCharacter],
    ) -> Vec<EngineEvent> {
        let mut events: Vec<EngineEvent> = state
            .modifiers()
            .iter()
            .flat_map(|m| m.on_kill(enemy, targets))
            .map(EngineEvent::Modifier)
            .collect();

        let Some(session) = self.session.as_mut() else {
            return events;
        };

        // Pay out before recording a boss so the first kill is priced as unbeaten
        if let Some(reward) = compute_kill_reward(enemy, state, targets, self.config.xp_award_radius) {
            for id in &reward.recipients {
                let Some(target) = targets.iter().find(|t| t.id == *id) else {
                    continue;
                };
                let Some(player) = characters.iter_mut().find(|c| c.id() == *id) else {
                    continue;
                };
                if let Some(report) = award_xp_to_player(
                    target,
                    reward.xp,
                    &mut player.progress,
                    &mut player.points,
                    &mut session.world,
                ) {
                    events.extend(xp_events(player, &report, session.world.level()));
                }
            }
        }

        if let Some(boss_id) = &enemy.boss_id {
            let first_kill = session.bosses.record_defeat(boss_id);
            events.push(EngineEvent::BossDefeated {
                boss_id: boss_id.clone(),
                first_kill,
            });
        }

        events
    }
}

fn xp_events(player: &PlayerCharacter, report: &LevelUpReport, world_level: u32) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    if report.xp_applied == 0 {
        return events;
    }
    events.push(EngineEvent::XpAwarded {
        player: player.id(),
        amount: report.xp_applied,
    });
    if report.leveled_up() {
        events.push(EngineEvent::LevelUp {
            player: player.id(),
            new_level: report.level_after,
            levels_gained: report.levels_gained(),
            world_level,
        });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{EnemyRarity, EnemyRarityAssignment, Modifier, Vec2};
    use crate::persistence::MemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn loaded_engine() -> ProgressionEngine {
        let mut engine = ProgressionEngine::new(EngineConfig::default());
        engine.on_level_load(&MemoryStore::new());
        engine
    }

    fn plain_state(level: u32) -> EnemyState {
        EnemyState::new(level, EnemyRarityAssignment::default(), "Zombie")
    }

    #[test]
    fn test_hooks_are_inert_without_world() {
        let engine = ProgressionEngine::new(EngineConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut enemy = Enemy::new("Zombie", 100, 20, 5);
        assert!(engine.on_spawn(&mut enemy, &[], &mut rng).is_none());
        assert!(!engine.is_level_loaded());
        assert_eq!(engine.registry().loaded_tree_ids().len(), 4);
    }

    #[test]
    fn test_kill_levels_nearby_player() {
        let mut engine = loaded_engine();
        let enemy = Enemy::new("Zombie", 100, 20, 5);
        let state = EnemyState::new(
            14,
            EnemyRarityAssignment {
                tier: EnemyRarity::Common,
                modifiers: vec![],
            },
            "Zombie",
        );
        let target = PlayerTarget::new(PlayerId(0), Vec2::new(10.0, 0.0));
        let mut players = vec![PlayerCharacter::new(PlayerId(0))];

        let events = engine.on_kill(&enemy, &state, &[target], &mut players);
        assert_eq!(
            events[0],
            EngineEvent::XpAwarded {
                player: PlayerId(0),
                amount: 140,
            }
        );
        assert!(events[1].is_level_up());
        assert_eq!(players[0].progress().level(), 2);
        assert_eq!(players[0].progress().xp(), 5);
        assert_eq!(engine.world().map(|w| w.level()), Some(2));
    }

    #[test]
    fn test_far_player_gets_nothing() {
        let mut engine = loaded_engine();
        let enemy = Enemy::new("Zombie", 100, 20, 5);
        let target = PlayerTarget::new(PlayerId(0), Vec2::new(5000.0, 0.0));
        let mut players = vec![PlayerCharacter::new(PlayerId(0))];
        let events = engine.on_kill(&enemy, &plain_state(5), &[target], &mut players);
        assert!(events.is_empty());
        assert_eq!(players[0].progress().xp(), 0);
    }

    #[test]
    fn test_boss_kill_is_tracked() {
        let mut engine = loaded_engine();
        let boss = Enemy::new("King Slime", 2000, 40, 10).as_boss("king_slime");
        let mut players: Vec<PlayerCharacter> = Vec::new();

        let events = engine.on_kill(&boss, &plain_state(1), &[], &mut players);
        assert_eq!(
            events,
            vec![EngineEvent::BossDefeated {
                boss_id: "king_slime".to_string(),
                first_kill: true,
            }]
        );
        let again = engine.on_kill(&boss, &plain_state(1), &[], &mut players);
        assert_eq!(
            again,
            vec![EngineEvent::BossDefeated {
                boss_id: "king_slime".to_string(),
                first_kill: false,
            }]
        );

        let mut store = MemoryStore::new();
        engine.on_level_unload(&mut store);
        engine.on_level_load(&store);
        assert!(engine.session().is_some_and(|s| s.bosses.is_defeated("king_slime")));
    }

    #[test]
    fn test_modifier_hooks_produce_events() {
        let engine = loaded_engine();
        let mut enemy = Enemy::new("Zombie", 100, 30, 5);
        let mut state = EnemyState::new(
            1,
            EnemyRarityAssignment {
                tier: EnemyRarity::Rare,
                modifiers: vec![Modifier::Venomous, Modifier::Regenerating],
            },
            "Zombie",
        );
        let attacker = PlayerTarget::new(PlayerId(2), Vec2::ZERO);

        let hit = engine.on_hit(&mut enemy, &state, &attacker);
        assert_eq!(hit.len(), 1);

        engine.per_tick_life_regen(&mut enemy, &state);
        assert_eq!(enemy.life_regen, 2);
        assert!(engine.per_tick_update(&enemy, &mut state, &[attacker]).is_empty());
    }

    #[test]
    fn test_world_round_trip_through_store() {
        let mut engine = loaded_engine();
        if let Some(world) = engine.world_mut() {
            world.set_level(12);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let variance = engine.roll_world_variance(&mut rng);
        assert!(variance.is_some_and(|v| (-1.0..=1.0).contains(&v)));

        let mut store = MemoryStore::new();
        engine.save_world(&mut store);
        let mut reloaded = ProgressionEngine::new(EngineConfig::default());
        reloaded.on_level_load(&store);
        assert_eq!(reloaded.world(), engine.world());
    }
}

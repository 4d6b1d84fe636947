//! One player's progression state, bundled for the engine hooks.

use crate::enemy::PlayerId;
use crate::leveling::{load_progress, save_progress, PlayerProgress};
use crate::passives::{ClassSelection, PassiveAllocations, PassivePointBalance, PlayerClass, TreeRegistry};
use crate::persistence::KvStore;
use crate::stats::{PlayerStats, StatLedger};

#[derive(Debug, Clone)]
pub struct PlayerCharacter {
    id: PlayerId,
    pub(crate) progress: PlayerProgress,
    pub(crate) points: PassivePointBalance,
    allocations: PassiveAllocations,
    class: ClassSelection,
    ledger: StatLedger,
    baseline: PlayerStats,
    live: PlayerStats,
    /// Registry generation the passive cache was built against
    passive_generation: u64,
}

impl PlayerCharacter {
    /// Fresh level 1 character with default stats.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            progress: PlayerProgress::new(),
            points: PassivePointBalance::new(),
            allocations: PassiveAllocations::new(),
            class: ClassSelection::new(),
            ledger: StatLedger::new(),
            baseline: PlayerStats::default(),
            live: PlayerStats::default(),
            passive_generation: 0,
        }
    }

    /// Rebuild a character from its store. Missing or corrupt fields come
    /// back as defaults.
    pub fn load(id: PlayerId, store: &impl KvStore, registry: &TreeRegistry) -> Self {
        Self {
            id,
            progress: load_progress(store),
            points: PassivePointBalance::load_from(store),
            allocations: PassiveAllocations::load_from(store, registry),
            class: ClassSelection::load_from(store),
            ledger: StatLedger::load_from(store),
            baseline: PlayerStats::default(),
            live: PlayerStats::default(),
            passive_generation: registry.generation(),
        }
    }

    pub fn save(&self, store: &mut impl KvStore) {
        save_progress(&self.progress, store);
        self.points.save_to(store);
        self.allocations.save_to(store);
        self.class.save_to(store);
        self.ledger.save_to(store);
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    /// Administrative access (level resets, debug commands).
    pub fn progress_mut(&mut self) -> &mut PlayerProgress {
        &mut self.progress
    }

    pub fn points(&self) -> &PassivePointBalance {
        &self.points
    }

    pub fn allocations(&self) -> &PassiveAllocations {
        &self.allocations
    }

    pub fn class(&self) -> PlayerClass {
        self.class.class()
    }

    pub fn ledger(&self) -> &StatLedger {
        &self.ledger
    }

    /// Permanent bonuses are added through here.
    pub fn ledger_mut(&mut self) -> &mut StatLedger {
        &mut self.ledger
    }

    pub fn baseline(&self) -> &PlayerStats {
        &self.baseline
    }

    /// Replace the stats the live block resets to each tick.
    pub fn set_baseline(&mut self, baseline: PlayerStats) {
        self.baseline = baseline;
    }

    pub fn live(&self) -> &PlayerStats {
        &self.live
    }

    pub fn select_class(&mut self, class: PlayerClass, store: &mut impl KvStore) -> bool {
        if !self.class.select(class) {
            return false;
        }
        self.class.save_to(store);
        true
    }

    /// Back to no class with the class tree refunded.
    pub fn respec(&mut self, registry: &TreeRegistry, store: &mut impl KvStore) -> u32 {
        let refunded = self.class.respec(registry, &mut self.allocations, &mut self.points);
        self.class.save_to(store);
        self.persist_passives(store);
        refunded
    }

    pub fn can_allocate(&self, registry: &TreeRegistry, tree_id: &str, node_id: &str) -> bool {
        self.allocations.can_allocate(registry, &self.points, tree_id, node_id)
    }

    pub fn allocate(
        &mut self,
        registry: &TreeRegistry,
        tree_id: &str,
        node_id: &str,
        store: &mut impl KvStore,
    ) -> bool {
        if !self.allocations.allocate(registry, &mut self.points, tree_id, node_id) {
            return false;
        }
        self.persist_passives(store);
        true
    }

    pub fn can_deallocate(&self, registry: &TreeRegistry, tree_id: &str, node_id: &str) -> bool {
        self.allocations.can_deallocate(registry, tree_id, node_id)
    }

    pub fn deallocate(
        &mut self,
        registry: &TreeRegistry,
        tree_id: &str,
        node_id: &str,
        store: &mut impl KvStore,
    ) -> bool {
        if !self.allocations.deallocate(registry, &mut self.points, tree_id, node_id) {
            return false;
        }
        self.persist_passives(store);
        true
    }

    pub fn reset_tree(&mut self, registry: &TreeRegistry, tree_id: &str, store: &mut impl KvStore) -> u32 {
        let refunded = self.allocations.reset_tree(registry, &mut self.points, tree_id);
        self.persist_passives(store);
        refunded
    }

    fn persist_passives(&self, store: &mut impl KvStore) {
        self.points.save_to(store);
        self.allocations.save_to(store);
    }

    /// Recompute the passive bonus cache from the registry's current trees.
    pub fn rebuild_passives(&mut self, registry: &TreeRegistry) {
        self.allocations.rebuild_cache(registry);
        self.passive_generation = registry.generation();
    }

    /// Rebuild the passive cache if the registry has reloaded since it was built.
    pub fn sync_passives(&mut self, registry: &TreeRegistry) -> bool {
        if self.passive_generation == registry.generation() {
            return false;
        }
        self.rebuild_passives(registry);
        true
    }

    /// Restore live stats to baseline and queue this tick's passive bonuses.
    pub fn reset_stats(&mut self) {
        self.ledger.reset_tick(&self.baseline, &mut self.live);
        self.ledger.add_transient(self.allocations.bonuses());
    }

    /// Apply the ledger onto the live block reset earlier this tick.
    pub fn apply_stats(&mut self) {
        self.ledger.apply(&mut self.live);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn registry() -> TreeRegistry {
        let mut registry = TreeRegistry::with_builtin_trees();
        registry.load_all();
        registry
    }

    #[test]
    fn test_allocate_persists_immediately() {
        let registry = registry();
        let mut store = MemoryStore::new();
        let mut player = PlayerCharacter::new(PlayerId(0));
        player.points.award(3);

        assert!(player.allocate(&registry, "warrior_tree", "warrior_start", &mut store));
        let reloaded = PlayerCharacter::load(PlayerId(0), &store, &registry);
        assert_eq!(reloaded.allocations().node_tier("warrior_tree", "warrior_start"), 1);
        assert_eq!(reloaded.points().available(), 2);
        assert_eq!(reloaded.points().spent(), 1);
    }

    #[test]
    fn test_rejected_allocation_leaves_store_alone() {
        let registry = registry();
        let mut store = MemoryStore::new();
        let mut player = PlayerCharacter::new(PlayerId(0));
        player.points.award(3);

        assert!(!player.allocate(&registry, "warrior_tree", "iron_skin", &mut store));
        assert!(store.is_empty());
        assert!(!player.deallocate(&registry, "warrior_tree", "warrior_start", &mut store));
    }

    #[test]
    fn test_stat_tick_does_not_compound() {
        let registry = registry();
        let mut store = MemoryStore::new();
        let mut player = PlayerCharacter::new(PlayerId(0));
        player.points.award(2);
        assert!(player.allocate(&registry, "warrior_tree", "warrior_start", &mut store));

        player.reset_stats();
        player.apply_stats();
        let first = player.live().clone();
        assert_ne!(&first, player.baseline());

        for _ in 0..10 {
            player.reset_stats();
            player.apply_stats();
        }
        assert_eq!(player.live(), &first);
    }

    #[test]
    fn test_reloaded_tree_bonuses_replace_cached_ones() {
        let mut registry = TreeRegistry::new();
        registry.register(
            TreeRegistry::load_tree_from_json(
                r#"{ "id": "t", "name": "T", "nodes": [ { "id": "a", "flat_bonuses": { "Defense": 5.0 } } ] }"#,
            )
            .unwrap(),
        );
        let mut store = MemoryStore::new();
        let mut player = PlayerCharacter::new(PlayerId(0));
        player.points.award(1);
        assert!(player.allocate(&registry, "t", "a", &mut store));
        player.sync_passives(&registry);
        assert_eq!(player.allocations().bonuses().flat("Defense"), 5.0);

        registry.register(
            TreeRegistry::load_tree_from_json(
                r#"{ "id": "t", "name": "T", "nodes": [ { "id": "a", "flat_bonuses": { "Defense": 1.0 } } ] }"#,
            )
            .unwrap(),
        );
        assert!(player.sync_passives(&registry));
        assert_eq!(player.allocations().bonuses().flat("Defense"), 1.0);
        assert!(!player.sync_passives(&registry));
    }

    #[test]
    fn test_full_save_round_trip() {
        let registry = registry();
        let mut store = MemoryStore::new();
        let mut player = PlayerCharacter::new(PlayerId(1));
        player.points.award(4);
        assert!(player.select_class(PlayerClass::Magic, &mut store));
        assert!(player.allocate(&registry, "mage_tree", "mage_start", &mut store));
        player.ledger_mut().add_permanent_flat(crate::stats::StatKind::MaxMana, 20.0);
        player.save(&mut store);

        let loaded = PlayerCharacter::load(PlayerId(1), &store, &registry);
        assert_eq!(loaded.class(), PlayerClass::Magic);
        assert_eq!(loaded.points(), player.points());
        assert_eq!(loaded.ledger().permanent().flat("MaxMana"), 20.0);
        assert_eq!(loaded.allocations().bonuses(), player.allocations().bonuses());
    }

    #[test]
    fn test_respec_refunds_and_persists() {
        let registry = registry();
        let mut store = MemoryStore::new();
        let mut player = PlayerCharacter::new(PlayerId(0));
        player.points.award(2);
        player.select_class(PlayerClass::Summoner, &mut store);
        assert!(player.allocate(&registry, "summoner_tree", "summoner_start", &mut store));

        assert_eq!(player.respec(&registry, &mut store), 1);
        let loaded = PlayerCharacter::load(PlayerId(0), &store, &registry);
        assert_eq!(loaded.class(), PlayerClass::None);
        assert_eq!(loaded.points().available(), 2);
        assert_eq!(loaded.allocations().allocated_tiers("summoner_tree"), 0);
    }
}

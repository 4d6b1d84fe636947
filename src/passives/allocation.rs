//! Per-player node allocations and the bonus cache derived from them.

use super::points::PassivePointBalance;
use super::registry::TreeRegistry;
use super::types::TreeAllocation;
use crate::persistence::KvStore;
use crate::stats::BonusTable;
use std::collections::BTreeMap;

pub const KEY_TREE_ALLOCATIONS: &str = "PassiveTreeAllocations";

/// Allocated tiers for every tree a player has touched, plus the cached
/// flat/percent totals. The cache is rebuilt from scratch after every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassiveAllocations {
    trees: BTreeMap<String, TreeAllocation>,
    cache: BonusTable,
}

impl PassiveAllocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_tier(&self, tree_id: &str, node_id: &str) -> u32 {
        self.trees
            .get(tree_id)
            .and_then(|alloc| alloc.get(node_id))
            .copied()
            .unwrap_or(0)
    }

    /// Allocation for one tree; empty if the player never touched it.
    pub fn tree_allocation(&self, tree_id: &str) -> TreeAllocation {
        self.trees.get(tree_id).cloned().unwrap_or_default()
    }

    /// Sum of allocated tiers in a tree.
    pub fn allocated_tiers(&self, tree_id: &str) -> u32 {
        self.trees
            .get(tree_id)
            .map(|alloc| alloc.values().fold(0, |acc: u32, tier| acc.saturating_add(*tier)))
            .unwrap_or(0)
    }

    /// Cached bonuses across every tree.
    pub fn bonuses(&self) -> &BonusTable {
        &self.cache
    }

    pub fn can_allocate(
        &self,
        registry: &TreeRegistry,
        points: &PassivePointBalance,
        tree_id: &str,
        node_id: &str,
    ) -> bool {
        let Some(node) = registry.get_tree(tree_id).and_then(|t| t.node(node_id)) else {
            return false;
        };
        let tier = self.node_tier(tree_id, node_id);
        if tier >= node.max_tier {
            return false;
        }
        let empty = TreeAllocation::new();
        let allocation = self.trees.get(tree_id).unwrap_or(&empty);
        if !node.prerequisites_met(allocation) {
            return false;
        }
        points.has_enough(node.upgrade_cost(tier) as i64)
    }

    /// Raise a node by one tier, paying its per-tier cost.
    pub fn allocate(
        &mut self,
        registry: &TreeRegistry,
        points: &mut PassivePointBalance,
        tree_id: &str,
        node_id: &str,
    ) -> bool {
        if !self.can_allocate(registry, points, tree_id, node_id) {
            tracing::debug!(tree = tree_id, node = node_id, "allocation rejected");
            return false;
        }
        let Some(node) = registry.get_tree(tree_id).and_then(|t| t.node(node_id)) else {
            return false;
        };
        let tier = self.node_tier(tree_id, node_id);
        if !points.spend(node.upgrade_cost(tier) as i64) {
            return false;
        }

        self.trees
            .entry(tree_id.to_string())
            .or_default()
            .insert(node_id.to_string(), tier + 1);
        self.rebuild_cache(registry);
        true
    }

    /// A node can be lowered if it is allocated and no direct dependent is.
    pub fn can_deallocate(&self, registry: &TreeRegistry, tree_id: &str, node_id: &str) -> bool {
        let Some(tree) = registry.get_tree(tree_id) else {
            return false;
        };
        if tree.node(node_id).is_none() || self.node_tier(tree_id, node_id) == 0 {
            return false;
        }
        tree.dependent_nodes(node_id)
            .iter()
            .all(|dependent| self.node_tier(tree_id, &dependent.id) == 0)
    }

    /// Lower a node by one tier and refund its per-tier cost.
    pub fn deallocate(
        &mut self,
        registry: &TreeRegistry,
        points: &mut PassivePointBalance,
        tree_id: &str,
        node_id: &str,
    ) -> bool {
        if !self.can_deallocate(registry, tree_id, node_id) {
            tracing::debug!(tree = tree_id, node = node_id, "deallocation rejected");
            return false;
        }
        let Some(node) = registry.get_tree(tree_id).and_then(|t| t.node(node_id)) else {
            return false;
        };

        points.refund(node.points_per_tier as i64);
        if let Some(allocation) = self.trees.get_mut(tree_id) {
            let remaining = allocation.get(node_id).copied().unwrap_or(0).saturating_sub(1);
            if remaining == 0 {
                allocation.remove(node_id);
            } else {
                allocation.insert(node_id.to_string(), remaining);
            }
        }
        self.rebuild_cache(registry);
        true
    }

    /// Clear one tree, refunding everything spent in it. Returns the points
    /// refunded. Trees that are not loaded are left untouched.
    pub fn reset_tree(
        &mut self,
        registry: &TreeRegistry,
        points: &mut PassivePointBalance,
        tree_id: &str,
    ) -> u32 {
        let Some(tree) = registry.get_tree(tree_id) else {
            return 0;
        };
        let Some(allocation) = self.trees.remove(tree_id) else {
            return 0;
        };

        let cost: u32 = allocation
            .iter()
            .filter_map(|(node_id, tier)| tree.node(node_id).map(|n| n.total_point_cost(*tier)))
            .fold(0, u32::saturating_add);
        let refunded = points.refund(cost as i64);
        self.rebuild_cache(registry);
        tracing::info!(tree = tree_id, refunded, "passive tree reset");
        refunded
    }

    /// Full recompute of the bonus cache from every allocated node.
    pub fn rebuild_cache(&mut self, registry: &TreeRegistry) {
        self.cache.clear();
        for (tree_id, allocation) in &self.trees {
            let Some(tree) = registry.get_tree(tree_id) else {
                continue;
            };
            for (node_id, tier) in allocation {
                let Some(node) = tree.node(node_id) else {
                    continue;
                };
                for stat in node.flat_bonuses.keys() {
                    self.cache.add_flat(stat, node.flat_bonus(stat, *tier));
                }
                for stat in node.percent_bonuses.keys() {
                    self.cache.add_percent(stat, node.percent_bonus(stat, *tier));
                }
            }
        }
    }

    /// Load allocations stored as `{tree: {node: tier}}` JSON. Unparseable
    /// data loads as empty; zero tiers are dropped and tiers above a known
    /// node's max are clamped.
    pub fn load_from(store: &impl KvStore, registry: &TreeRegistry) -> Self {
        let json = store.get_string(KEY_TREE_ALLOCATIONS, "");
        let raw: BTreeMap<String, BTreeMap<String, i64>> = if json.is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable passive allocations");
                BTreeMap::new()
            })
        };

        let mut trees = BTreeMap::new();
        for (tree_id, nodes) in raw {
            let tree = registry.get_tree(&tree_id);
            let allocation: TreeAllocation = nodes
                .into_iter()
                .filter(|(_, tier)| *tier > 0)
                .map(|(node_id, tier)| {
                    let max = tree
                        .and_then(|t| t.node(&node_id))
                        .map(|n| n.max_tier as i64)
                        .unwrap_or(u32::MAX as i64);
                    let tier = tier.min(max) as u32;
                    (node_id, tier)
                })
                .collect();
            if !allocation.is_empty() {
                trees.insert(tree_id, allocation);
            }
        }

        let mut allocations = Self {
            trees,
            cache: BonusTable::new(),
        };
        allocations.rebuild_cache(registry);
        allocations
    }

    pub fn save_to(&self, store: &mut impl KvStore) {
        match serde_json::to_string(&self.trees) {
            Ok(json) => store.set_string(KEY_TREE_ALLOCATIONS, &json),
            Err(e) => tracing::error!(error = %e, "failed to serialize passive allocations"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passives::types::{PassiveNode, PassiveTree, TreeDefinition};
    use crate::persistence::MemoryStore;

    fn registry() -> TreeRegistry {
        let tree = PassiveTree::from_definition(TreeDefinition {
            id: "t".to_string(),
            name: "Test".to_string(),
            description: String::new(),
            nodes: vec![
                PassiveNode::new("root").with_flat("Defense", 2.0),
                PassiveNode::new("mid")
                    .with_prerequisite("root")
                    .with_max_tier(3)
                    .with_cost(2)
                    .with_percent("MeleeDamage", 0.05),
                PassiveNode::new("leaf").with_prerequisite("mid"),
            ],
        })
        .unwrap();
        let mut registry = TreeRegistry::new();
        registry.register(tree);
        registry
    }

    fn points(n: i64) -> PassivePointBalance {
        let mut p = PassivePointBalance::new();
        p.award(n);
        p
    }

    #[test]
    fn test_allocate_root() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(5);
        assert!(alloc.allocate(&reg, &mut pts, "t", "root"));
        assert_eq!(alloc.node_tier("t", "root"), 1);
        assert_eq!(pts.available(), 4);
        assert_eq!(alloc.bonuses().flat("Defense"), 2.0);
    }

    #[test]
    fn test_allocate_with_unmet_prerequisite_changes_nothing() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(5);
        assert!(!alloc.allocate(&reg, &mut pts, "t", "mid"));
        assert_eq!(alloc, PassiveAllocations::new());
        assert_eq!(pts.available(), 5);
    }

    #[test]
    fn test_allocate_rejects_maxed_and_unaffordable() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(3);
        assert!(alloc.allocate(&reg, &mut pts, "t", "root"));
        assert!(!alloc.allocate(&reg, &mut pts, "t", "root"), "root is max tier 1");
        assert!(alloc.allocate(&reg, &mut pts, "t", "mid"));
        // 0 points left, mid costs 2
        assert!(!alloc.can_allocate(&reg, &pts, "t", "mid"));
        assert!(!alloc.allocate(&reg, &mut pts, "t", "mid"));
        assert_eq!(alloc.node_tier("t", "mid"), 1);
    }

    #[test]
    fn test_unknown_tree_or_node_rejected() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(5);
        assert!(!alloc.allocate(&reg, &mut pts, "nope", "root"));
        assert!(!alloc.allocate(&reg, &mut pts, "t", "nope"));
        assert!(!alloc.deallocate(&reg, &mut pts, "t", "nope"));
    }

    #[test]
    fn test_allocate_then_deallocate_restores_state() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(5);
        alloc.allocate(&reg, &mut pts, "t", "root");
        let before_alloc = alloc.clone();
        let before_pts = pts;

        assert!(alloc.allocate(&reg, &mut pts, "t", "mid"));
        assert!(alloc.deallocate(&reg, &mut pts, "t", "mid"));
        assert_eq!(alloc, before_alloc);
        assert_eq!(pts, before_pts);
    }

    #[test]
    fn test_deallocate_blocked_by_dependent() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(5);
        alloc.allocate(&reg, &mut pts, "t", "root");
        alloc.allocate(&reg, &mut pts, "t", "mid");
        assert!(!alloc.deallocate(&reg, &mut pts, "t", "root"));
        assert_eq!(alloc.node_tier("t", "root"), 1);
    }

    #[test]
    fn test_deallocate_unallocated_rejected() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(1);
        assert!(!alloc.deallocate(&reg, &mut pts, "t", "root"));
        assert_eq!(pts.available(), 1);
    }

    #[test]
    fn test_deallocate_steps_down_one_tier() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(7);
        alloc.allocate(&reg, &mut pts, "t", "root");
        alloc.allocate(&reg, &mut pts, "t", "mid");
        alloc.allocate(&reg, &mut pts, "t", "mid");
        assert_eq!(pts.available(), 2);
        assert!(alloc.deallocate(&reg, &mut pts, "t", "mid"));
        assert_eq!(alloc.node_tier("t", "mid"), 1);
        assert_eq!(pts.available(), 4);
        assert!((alloc.bonuses().percent("MeleeDamage") - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_reset_tree_refunds_everything() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(10);
        alloc.allocate(&reg, &mut pts, "t", "root");
        alloc.allocate(&reg, &mut pts, "t", "mid");
        alloc.allocate(&reg, &mut pts, "t", "mid");
        alloc.allocate(&reg, &mut pts, "t", "leaf");
        assert_eq!(pts.available(), 4);

        assert_eq!(alloc.reset_tree(&reg, &mut pts, "t"), 6);
        assert_eq!(pts.available(), pts.total_earned());
        assert_eq!(alloc.allocated_tiers("t"), 0);
        assert!(alloc.bonuses().is_empty());
    }

    #[test]
    fn test_reset_untouched_tree_is_noop() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(3);
        assert_eq!(alloc.reset_tree(&reg, &mut pts, "t"), 0);
        assert_eq!(alloc.reset_tree(&reg, &mut pts, "unknown"), 0);
    }

    #[test]
    fn test_cache_scales_with_tier() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(10);
        alloc.allocate(&reg, &mut pts, "t", "root");
        for _ in 0..3 {
            alloc.allocate(&reg, &mut pts, "t", "mid");
        }
        assert!((alloc.bonuses().percent("MeleeDamage") - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_persistence_roundtrip() {
        let reg = registry();
        let mut alloc = PassiveAllocations::new();
        let mut pts = points(10);
        alloc.allocate(&reg, &mut pts, "t", "root");
        alloc.allocate(&reg, &mut pts, "t", "mid");

        let mut store = MemoryStore::new();
        alloc.save_to(&mut store);
        let loaded = PassiveAllocations::load_from(&store, &reg);
        assert_eq!(loaded, alloc);
    }

    #[test]
    fn test_load_sanitizes() {
        let reg = registry();
        let mut store = MemoryStore::new();
        store.set_string(
            KEY_TREE_ALLOCATIONS,
            r#"{ "t": { "root": 1, "mid": 99, "leaf": 0 }, "other_tree": { "x": 2 } }"#,
        );
        let loaded = PassiveAllocations::load_from(&store, &reg);
        assert_eq!(loaded.node_tier("t", "mid"), 3);
        assert_eq!(loaded.node_tier("t", "leaf"), 0);
        assert!(!loaded.tree_allocation("t").contains_key("leaf"));
        // Unknown trees are kept but contribute nothing
        assert_eq!(loaded.node_tier("other_tree", "x"), 2);
    }

    #[test]
    fn test_load_garbage_is_empty() {
        let reg = registry();
        let mut store = MemoryStore::new();
        store.set_string(KEY_TREE_ALLOCATIONS, "not json at all");
        assert_eq!(PassiveAllocations::load_from(&store, &reg), PassiveAllocations::new());
    }
}

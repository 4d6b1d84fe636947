//! Passive tree definitions: nodes, trees and load-time validation.

use crate::core::error::TreeError;
use crate::stats::format_stat_name;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Tier per node id within one tree. Nodes at tier 0 have no entry.
pub type TreeAllocation = BTreeMap<String, u32>;

fn default_one() -> u32 {
    1
}

/// One node of a passive tree, as written in a definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveNode {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_one")]
    pub max_tier: u32,
    #[serde(default = "default_one")]
    pub points_per_tier: u32,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// Layout position for the tree panel
    #[serde(default)]
    pub position: (i32, i32),
    #[serde(default)]
    pub flat_bonuses: BTreeMap<String, f64>,
    #[serde(default)]
    pub percent_bonuses: BTreeMap<String, f64>,
}

impl PassiveNode {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: String::new(),
            description: String::new(),
            max_tier: 1,
            points_per_tier: 1,
            prerequisites: Vec::new(),
            position: (0, 0),
            flat_bonuses: BTreeMap::new(),
            percent_bonuses: BTreeMap::new(),
        }
    }

    pub fn with_max_tier(mut self, max_tier: u32) -> Self {
        self.max_tier = max_tier;
        self
    }

    pub fn with_cost(mut self, points_per_tier: u32) -> Self {
        self.points_per_tier = points_per_tier;
        self
    }

    pub fn with_prerequisite(mut self, id: &str) -> Self {
        self.prerequisites.push(id.to_string());
        self
    }

    pub fn with_flat(mut self, stat: &str, value: f64) -> Self {
        self.flat_bonuses.insert(stat.to_string(), value);
        self
    }

    pub fn with_percent(mut self, stat: &str, value: f64) -> Self {
        self.percent_bonuses.insert(stat.to_string(), value);
        self
    }

    /// Points spent to reach `tier` (clamped to max): linear, `tier * points_per_tier`.
    pub fn total_point_cost(&self, tier: u32) -> u32 {
        tier.min(self.max_tier).saturating_mul(self.points_per_tier)
    }

    /// Cost to go from `current_tier` to the next one, 0 when maxed.
    pub fn upgrade_cost(&self, current_tier: u32) -> u32 {
        if current_tier >= self.max_tier {
            0
        } else {
            self.points_per_tier
        }
    }

    pub fn flat_bonus(&self, stat: &str, tier: u32) -> f64 {
        self.flat_bonuses.get(stat).copied().unwrap_or(0.0) * tier as f64
    }

    pub fn percent_bonus(&self, stat: &str, tier: u32) -> f64 {
        self.percent_bonuses.get(stat).copied().unwrap_or(0.0) * tier as f64
    }

    pub fn prerequisites_met(&self, allocation: &TreeAllocation) -> bool {
        self.prerequisites
            .iter()
            .all(|p| allocation.get(p).copied().unwrap_or(0) > 0)
    }

    /// Tooltip text for this node at `tier`.
    pub fn formatted_description(&self, tier: u32) -> String {
        if tier == 0 {
            return self.description.clone();
        }

        let mut result = format!("{}\n", self.description);
        for (stat, value) in &self.flat_bonuses {
            result += &format!(
                "\n+{} {}",
                format_amount(value * tier as f64),
                format_stat_name(stat)
            );
        }
        for (stat, value) in &self.percent_bonuses {
            result += &format!(
                "\n+{}% {}",
                format_amount(value * tier as f64 * 100.0),
                format_stat_name(stat)
            );
        }
        if self.max_tier > 1 {
            result += &format!("\n\nTier: {}/{}", tier, self.max_tier);
        }
        result
    }
}

/// Two decimals at most, without trailing zeros.
fn format_amount(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}")
}

/// Serialized shape of a tree definition file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<PassiveNode>,
}

/// A validated, immutable passive tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PassiveTree {
    id: String,
    name: String,
    description: String,
    nodes: BTreeMap<String, PassiveNode>,
}

impl PassiveTree {
    /// Build a tree, rejecting empty ids, duplicate or malformed nodes,
    /// dangling prerequisites and prerequisite cycles.
    pub fn from_definition(definition: TreeDefinition) -> Result<Self, TreeError> {
        if definition.id.trim().is_empty() {
            return Err(TreeError::EmptyTreeId);
        }

        let mut nodes = BTreeMap::new();
        for node in definition.nodes {
            if node.id.trim().is_empty() {
                return Err(TreeError::InvalidNode {
                    node: node.id,
                    reason: "empty node id".to_string(),
                });
            }
            if node.max_tier == 0 {
                return Err(TreeError::InvalidNode {
                    node: node.id,
                    reason: "max_tier must be at least 1".to_string(),
                });
            }
            if node.points_per_tier == 0 {
                return Err(TreeError::InvalidNode {
                    node: node.id,
                    reason: "points_per_tier must be at least 1".to_string(),
                });
            }
            if nodes.contains_key(&node.id) {
                return Err(TreeError::DuplicateNode {
                    tree: definition.id,
                    node: node.id,
                });
            }
            nodes.insert(node.id.clone(), node);
        }

        let tree = Self {
            id: definition.id,
            name: definition.name,
            description: definition.description,
            nodes,
        };
        tree.validate()?;
        Ok(tree)
    }

    fn validate(&self) -> Result<(), TreeError> {
        for node in self.nodes.values() {
            for prerequisite in &node.prerequisites {
                if !self.nodes.contains_key(prerequisite) {
                    return Err(TreeError::InvalidPrerequisite {
                        node: node.id.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
        }

        let mut acyclic: HashSet<&str> = HashSet::new();
        for id in self.nodes.keys() {
            let mut path = HashSet::new();
            if self.has_cycle_from(id, &mut path, &mut acyclic) {
                return Err(TreeError::CircularDependency { node: id.clone() });
            }
        }
        Ok(())
    }

    /// Depth-first walk along prerequisite edges. `path` holds the nodes on
    /// the current branch only; `acyclic` remembers fully explored nodes.
    fn has_cycle_from<'a>(
        &'a self,
        id: &'a str,
        path: &mut HashSet<&'a str>,
        acyclic: &mut HashSet<&'a str>,
    ) -> bool {
        if acyclic.contains(id) {
            return false;
        }
        if !path.insert(id) {
            return true;
        }
        if let Some(node) = self.nodes.get(id) {
            for prerequisite in &node.prerequisites {
                if self.has_cycle_from(prerequisite, path, acyclic) {
                    return true;
                }
            }
        }
        path.remove(id);
        acyclic.insert(id);
        false
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn node(&self, id: &str) -> Option<&PassiveNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PassiveNode> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes with no prerequisites.
    pub fn starting_nodes(&self) -> Vec<&PassiveNode> {
        self.nodes
            .values()
            .filter(|n| n.prerequisites.is_empty())
            .collect()
    }

    /// Nodes that list `id` as a direct prerequisite.
    pub fn dependent_nodes(&self, id: &str) -> Vec<&PassiveNode> {
        self.nodes
            .values()
            .filter(|n| n.prerequisites.iter().any(|p| p == id))
            .collect()
    }

    /// Points needed to max every node.
    pub fn max_points_required(&self) -> u32 {
        self.nodes
            .values()
            .map(|n| n.total_point_cost(n.max_tier))
            .fold(0, u32::saturating_add)
    }
}

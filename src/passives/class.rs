//! Class selection. Each class unlocks exactly one passive tree.

use super::allocation::PassiveAllocations;
use super::points::PassivePointBalance;
use super::registry::TreeRegistry;
use crate::persistence::KvStore;
use serde::{Deserialize, Serialize};

pub const KEY_SELECTED_CLASS: &str = "SelectedClass";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerClass {
    #[default]
    None,
    Melee,
    Ranged,
    Magic,
    Summoner,
}

impl PlayerClass {
    /// Selectable classes, in panel order
    pub const SELECTABLE: [PlayerClass; 4] = [
        PlayerClass::Melee,
        PlayerClass::Ranged,
        PlayerClass::Magic,
        PlayerClass::Summoner,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlayerClass::None => "None",
            PlayerClass::Melee => "Melee",
            PlayerClass::Ranged => "Ranged",
            PlayerClass::Magic => "Magic",
            PlayerClass::Summoner => "Summoner",
        }
    }

    /// Unknown names parse as `None`.
    pub fn parse(name: &str) -> PlayerClass {
        PlayerClass::SELECTABLE
            .into_iter()
            .find(|c| c.name() == name)
            .unwrap_or(PlayerClass::None)
    }

    pub fn tree_id(&self) -> Option<&'static str> {
        match self {
            PlayerClass::None => None,
            PlayerClass::Melee => Some("warrior_tree"),
            PlayerClass::Ranged => Some("ranger_tree"),
            PlayerClass::Magic => Some("mage_tree"),
            PlayerClass::Summoner => Some("summoner_tree"),
        }
    }
}

/// A player's class choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassSelection {
    class: PlayerClass,
}

impl ClassSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(&self) -> PlayerClass {
        self.class
    }

    pub fn has_selected(&self) -> bool {
        self.class != PlayerClass::None
    }

    /// Pick a class. Only allowed while no class is selected, and picking
    /// `None` is rejected.
    pub fn select(&mut self, class: PlayerClass) -> bool {
        if self.has_selected() || class == PlayerClass::None {
            return false;
        }
        self.class = class;
        tracing::info!(class = class.name(), "class selected");
        true
    }

    /// Clear the class and refund its tree. Returns the points refunded.
    pub fn respec(
        &mut self,
        registry: &TreeRegistry,
        allocations: &mut PassiveAllocations,
        points: &mut PassivePointBalance,
    ) -> u32 {
        let refunded = match self.class.tree_id() {
            Some(tree_id) => allocations.reset_tree(registry, points, tree_id),
            None => 0,
        };
        self.class = PlayerClass::None;
        refunded
    }

    pub fn load_from(store: &impl KvStore) -> Self {
        Self {
            class: PlayerClass::parse(&store.get_string(KEY_SELECTED_CLASS, "None")),
        }
    }

    pub fn save_to(&self, store: &mut impl KvStore) {
        store.set_string(KEY_SELECTED_CLASS, self.class.name());
    }
}

use crate::persistence::KvStore;
use std::collections::BTreeSet;

pub const KEY_DEFEATED_BOSSES: &str = "DefeatedBosses";

/// Either of these unlocks the biome-gated modifiers everywhere.
pub const EVIL_BOSS_IDS: [&str; 2] = ["eater_of_worlds", "brain_of_cthulhu"];

/// Which bosses this world has seen die.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BossKillTracker {
    defeated: BTreeSet<String>,
}

impl BossKillTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a boss is recorded.
    pub fn record_defeat(&mut self, boss_id: &str) -> bool {
        let first = self.defeated.insert(boss_id.to_string());
        if first {
            tracing::info!(boss = boss_id, "boss defeated for the first time");
        }
        first
    }

    pub fn is_defeated(&self, boss_id: &str) -> bool {
        self.defeated.contains(boss_id)
    }

    pub fn defeated_count(&self) -> usize {
        self.defeated.len()
    }

    pub fn evil_boss_defeated(&self) -> bool {
        EVIL_BOSS_IDS.iter().any(|id| self.is_defeated(id))
    }

    pub fn clear(&mut self) {
        self.defeated.clear();
    }

    pub fn load_from(store: &impl KvStore) -> Self {
        let raw = store.get_string(KEY_DEFEATED_BOSSES, "");
        if raw.is_empty() {
            return Self::new();
        }
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => Self {
                defeated: ids.into_iter().filter(|id| !id.is_empty()).collect(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "corrupt boss kill list, starting empty");
                Self::new()
            }
        }
    }

    pub fn save_to(&self, store: &mut impl KvStore) {
        let ids: Vec<&String> = self.defeated.iter().collect();
        match serde_json::to_string(&ids) {
            Ok(json) => store.set_string(KEY_DEFEATED_BOSSES, &json),
            Err(e) => tracing::warn!(error = %e, "failed to serialize boss kill list"),
        }
    }
}

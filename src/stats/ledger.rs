//! Bonus accumulators and the per-tick reset-then-reapply cycle.

use super::types::{PlayerStats, StatKind};
use crate::persistence::KvStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat and percent bonuses keyed by stat name.
///
/// Names that are not in the [`StatKind`] table are kept but never applied,
/// so newer tree definitions load on older engines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusTable {
    #[serde(default)]
    pub flat: BTreeMap<String, f64>,
    #[serde(default)]
    pub percent: BTreeMap<String, f64>,
}

impl BonusTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_flat(&mut self, stat: &str, value: f64) {
        *self.flat.entry(stat.to_string()).or_insert(0.0) += value;
    }

    pub fn add_percent(&mut self, stat: &str, value: f64) {
        *self.percent.entry(stat.to_string()).or_insert(0.0) += value;
    }

    pub fn flat(&self, stat: &str) -> f64 {
        self.flat.get(stat).copied().unwrap_or(0.0)
    }

    pub fn percent(&self, stat: &str) -> f64 {
        self.percent.get(stat).copied().unwrap_or(0.0)
    }

    pub fn merge(&mut self, other: &BonusTable) {
        for (stat, v) in &other.flat {
            self.add_flat(stat, *v);
        }
        for (stat, v) in &other.percent {
            self.add_percent(stat, *v);
        }
    }

    pub fn clear(&mut self) {
        self.flat.clear();
        self.percent.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty() && self.percent.is_empty()
    }

    fn apply_flats(&self, stats: &mut PlayerStats) {
        for (name, value) in &self.flat {
            if let Some(kind) = StatKind::from_name(name) {
                kind.apply_flat(stats, *value);
            }
        }
    }

    fn apply_percents(&self, stats: &mut PlayerStats) {
        for (name, value) in &self.percent {
            if let Some(kind) = StatKind::from_name(name) {
                kind.apply_percent(stats, *value);
            }
        }
    }

    /// Apply every flat bonus, then every percent bonus.
    pub fn apply_to(&self, stats: &mut PlayerStats) {
        self.apply_flats(stats);
        self.apply_percents(stats);
    }
}

/// Per-player bonus ledger.
///
/// `permanent` survives sessions (consumable upgrades and the like).
/// `transient` is cleared at the start of every tick and refilled from
/// sources such as the passive tree cache before being applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatLedger {
    permanent: BonusTable,
    transient: BonusTable,
}

impl StatLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permanent(&self) -> &BonusTable {
        &self.permanent
    }

    pub fn transient(&self) -> &BonusTable {
        &self.transient
    }

    pub fn add_permanent_flat(&mut self, stat: StatKind, value: f64) {
        self.permanent.add_flat(stat.name(), value);
    }

    pub fn add_permanent_percent(&mut self, stat: StatKind, value: f64) {
        self.permanent.add_percent(stat.name(), value);
    }

    pub fn clear_permanent(&mut self) {
        self.permanent.clear();
    }

    /// Start of tick: drop last tick's transient bonuses and restore the live
    /// block to baseline.
    pub fn reset_tick(&mut self, baseline: &PlayerStats, live: &mut PlayerStats) {
        self.transient.clear();
        live.clone_from(baseline);
    }

    pub fn add_transient(&mut self, bonuses: &BonusTable) {
        self.transient.merge(bonuses);
    }

    /// Apply permanent and transient bonuses to a live block that was reset
    /// this tick. Flats from both sources land before any percent.
    pub fn apply(&self, live: &mut PlayerStats) {
        self.permanent.apply_flats(live);
        self.transient.apply_flats(live);
        self.permanent.apply_percents(live);
        self.transient.apply_percents(live);
    }

    pub fn load_from(store: &impl KvStore) -> Self {
        let mut ledger = Self::new();
        for kind in StatKind::ALL {
            let flat = store.get_float(&flat_key(kind), 0.0);
            let mult = store.get_float(&mult_key(kind), 0.0);
            if flat != 0.0 {
                ledger.add_permanent_flat(kind, flat);
            }
            if mult != 0.0 {
                ledger.add_permanent_percent(kind, mult);
            }
        }
        ledger
    }

    pub fn save_to(&self, store: &mut impl KvStore) {
        for kind in StatKind::ALL {
            let flat = self.permanent.flat(kind.name());
            let mult = self.permanent.percent(kind.name());
            if flat != 0.0 {
                store.set_float(&flat_key(kind), flat);
            } else {
                store.remove(&flat_key(kind));
            }
            if mult != 0.0 {
                store.set_float(&mult_key(kind), mult);
            } else {
                store.remove(&mult_key(kind));
            }
        }
    }
}

fn flat_key(kind: StatKind) -> String {
    format!("Bonus{}_Flat", kind.name())
}

fn mult_key(kind: StatKind) -> String {
    format!("Bonus{}_Mult", kind.name())
}

use crate::core::constants::MAX_PLAYER_LEVEL;
use crate::core::progression::{cumulative_xp_for_level, xp_required};

/// A player's level and XP into that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerProgress {
    pub(super) level: u32,
    pub(super) xp: u64,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerProgress {
    pub fn new() -> Self {
        Self { level: 1, xp: 0 }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= MAX_PLAYER_LEVEL
    }

    /// Fraction of the way to the next level, 1.0 at the cap.
    pub fn xp_progress(&self) -> f64 {
        if self.is_max_level() {
            return 1.0;
        }
        (self.xp as f64 / xp_required(self.level) as f64).min(1.0)
    }

    /// XP still needed for the next level, 0 at the cap.
    pub fn xp_to_next_level(&self) -> u64 {
        if self.is_max_level() {
            return 0;
        }
        xp_required(self.level).saturating_sub(self.xp)
    }

    /// Lifetime XP: every completed level plus XP into the current one.
    pub fn total_xp(&self) -> u64 {
        cumulative_xp_for_level(self.level) + self.xp
    }

    /// Administrative reset back to level 1.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Administrative level change. Clamps to [1, cap] and clears XP; no
    /// level-up side effects fire.
    pub fn set_level(&mut self, level: i64) {
        self.level = level.clamp(1, MAX_PLAYER_LEVEL as i64) as u32;
        self.xp = 0;
    }

    /// Administrative XP change. Negative values become 0 and the value is
    /// held below the current requirement.
    pub fn set_xp(&mut self, xp: i64) {
        let xp = xp.max(0) as u64;
        self.xp = if self.is_max_level() {
            0
        } else {
            xp.min(xp_required(self.level) - 1)
        };
    }
}

/// Outcome of a single XP grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelUpReport {
    pub xp_applied: u64,
    pub level_before: u32,
    pub level_after: u32,
}

impl LevelUpReport {
    pub fn levels_gained(&self) -> u32 {
        self.level_after - self.level_before
    }

    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

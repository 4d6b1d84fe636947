//! Passive point economy.

use crate::persistence::KvStore;

pub const KEY_AVAILABLE_POINTS: &str = "AvailablePassivePoints";
pub const KEY_TOTAL_POINTS_EARNED: &str = "TotalPassivePointsEarned";
pub const KEY_SPENT_POINTS: &str = "SpentPassivePoints";

/// A player's passive points. `total_earned == available + spent` holds after
/// every method returns; fields are only reachable through those methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassivePointBalance {
    available: u32,
    total_earned: u32,
    spent: u32,
}

impl PassivePointBalance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn available(&self) -> u32 {
        self.available
    }

    pub fn total_earned(&self) -> u32 {
        self.total_earned
    }

    pub fn spent(&self) -> u32 {
        self.spent
    }

    /// Grant new points. Ignores `amount <= 0`.
    pub fn award(&mut self, amount: i64) {
        let Ok(amount) = u32::try_from(amount) else {
            return;
        };
        if amount == 0 {
            return;
        }
        let amount = amount.min(u32::MAX - self.total_earned);
        self.available += amount;
        self.total_earned += amount;
    }

    pub fn has_enough(&self, amount: i64) -> bool {
        amount <= self.available as i64
    }

    /// Move points from available to spent. Fails for `amount <= 0` or an
    /// insufficient balance.
    pub fn spend(&mut self, amount: i64) -> bool {
        if amount <= 0 || !self.has_enough(amount) {
            return false;
        }
        let amount = amount as u32;
        self.available -= amount;
        self.spent += amount;
        true
    }

    /// Move points back from spent, capped at what was spent.
    /// Returns the number of points actually refunded.
    pub fn refund(&mut self, amount: i64) -> u32 {
        if amount <= 0 {
            return 0;
        }
        let amount = amount.min(self.spent as i64) as u32;
        self.spent -= amount;
        self.available += amount;
        amount
    }

    /// Refund everything that was spent.
    pub fn reset_all(&mut self) {
        self.available = self.total_earned;
        self.spent = 0;
    }

    /// Wipe the balance entirely, including lifetime earnings.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Load the balance. A stored balance that breaks the invariant or holds
    /// negative values is treated as absent.
    pub fn load_from(store: &impl KvStore) -> Self {
        let available = store.get_int(KEY_AVAILABLE_POINTS, 0);
        let total = store.get_int(KEY_TOTAL_POINTS_EARNED, 0);
        let spent = store.get_int(KEY_SPENT_POINTS, 0);

        let in_range = |v: i64| (0..=u32::MAX as i64).contains(&v);
        if !in_range(available) || !in_range(total) || !in_range(spent) || available + spent != total
        {
            tracing::warn!(
                available,
                total,
                spent,
                "stored passive point balance is inconsistent; starting fresh"
            );
            return Self::default();
        }

        Self {
            available: available as u32,
            total_earned: total as u32,
            spent: spent as u32,
        }
    }

    pub fn save_to(&self, store: &mut impl KvStore) {
        store.set_int(KEY_AVAILABLE_POINTS, self.available as i64);
        store.set_int(KEY_TOTAL_POINTS_EARNED, self.total_earned as i64);
        store.set_int(KEY_SPENT_POINTS, self.spent as i64);
    }

    #[cfg(test)]
    fn is_balanced(&self) -> bool {
        self.total_earned == self.available + self.spent
    }
}

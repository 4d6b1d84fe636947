use crate::core::constants::*;
use crate::core::progression::scaled_value;

/// Difficulty state of one loaded world.
///
/// Fields are private so the clamps cannot be bypassed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldState {
    level: u32,
    variance: f64,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldState {
    pub fn new() -> Self {
        Self {
            level: BASE_WORLD_LEVEL,
            variance: 0.0,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Clamps to [BASE_WORLD_LEVEL, MAX_WORLD_LEVEL].
    pub fn set_level(&mut self, level: i64) {
        self.level = level.clamp(BASE_WORLD_LEVEL as i64, MAX_WORLD_LEVEL as i64) as u32;
    }

    /// Clamps to the variance bounds. NaN resets to 0.
    pub fn set_variance(&mut self, variance: f64) {
        self.variance = if variance.is_nan() {
            0.0
        } else {
            variance.clamp(MIN_WORLD_VARIANCE, MAX_WORLD_VARIANCE)
        };
    }

    /// No-op for `amount <= 0`.
    pub fn increase_world_level(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        self.set_level((self.level as i64).saturating_add(amount));
    }

    pub fn effective_level(&self) -> f64 {
        self.level as f64 + self.variance
    }

    pub fn health_multiplier(&self) -> f64 {
        scaled_value(1.0, self.effective_level(), WORLD_HEALTH_SCALING)
    }

    pub fn damage_multiplier(&self) -> f64 {
        scaled_value(1.0, self.effective_level(), WORLD_DAMAGE_SCALING)
    }

    pub fn loot_multiplier(&self) -> f64 {
        scaled_value(1.0, self.effective_level(), WORLD_LOOT_SCALING)
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= MAX_WORLD_LEVEL
    }

    pub fn variance_range(&self) -> (f64, f64) {
        (MIN_WORLD_VARIANCE, MAX_WORLD_VARIANCE)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_defaults() {
        let world = WorldState::new();
        assert_eq!(world.level(), 1);
        assert_eq!(world.variance(), 0.0);
        assert_eq!(world.effective_level(), 1.0);
        assert!((world.health_multiplier() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_level_clamps() {
        let mut world = WorldState::new();
        world.set_level(0);
        assert_eq!(world.level(), 1);
        world.set_level(-50);
        assert_eq!(world.level(), 1);
        world.set_level(250);
        assert_eq!(world.level(), 100);
        assert!(world.is_max_level());
    }

    #[test]
    fn test_set_variance_clamps() {
        let mut world = WorldState::new();
        world.set_variance(5.0);
        assert_eq!(world.variance(), 2.0);
        world.set_variance(-5.0);
        assert_eq!(world.variance(), -2.0);
        world.set_variance(f64::NAN);
        assert_eq!(world.variance(), 0.0);
    }

    #[test]
    fn test_increase_ignores_non_positive() {
        let mut world = WorldState::new();
        world.increase_world_level(0);
        world.increase_world_level(-3);
        assert_eq!(world.level(), 1);
        world.increase_world_level(4);
        assert_eq!(world.level(), 5);
        world.increase_world_level(1000);
        assert_eq!(world.level(), 100);
    }

    #[test]
    fn test_multipliers_use_effective_level() {
        let mut world = WorldState::new();
        world.set_level(11);
        world.set_variance(-1.0);
        // effective 10: 1 + 9 * factor
        assert!((world.health_multiplier() - (1.0 + 9.0 * 0.15)).abs() < 1e-9);
        assert!((world.damage_multiplier() - (1.0 + 9.0 * 0.14)).abs() < 1e-9);
        assert!((world.loot_multiplier() - (1.0 + 9.0 * 0.01)).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut world = WorldState::new();
        world.set_level(40);
        world.set_variance(1.5);
        world.reset();
        assert_eq!(world, WorldState::new());
    }
}

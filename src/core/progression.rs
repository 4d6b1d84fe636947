//! Pure progression math shared by leveling and enemy scaling.

use super::constants::*;

/// XP needed to advance from `level` to `level + 1`.
///
/// Returns [`XP_UNREACHABLE`] at the level cap.
pub fn xp_required(level: u32) -> u64 {
    if level >= MAX_PLAYER_LEVEL {
        return XP_UNREACHABLE;
    }
    let l = level as u64;
    XP_CURVE_A + XP_CURVE_B * l + XP_CURVE_C * l * l
}

/// Sum of requirements for every level below `level`.
pub fn cumulative_xp_for_level(level: u32) -> u64 {
    (1..level.min(MAX_PLAYER_LEVEL)).map(xp_required).sum()
}

/// `base * (1 + (effective_level - 1) * per_level_factor)`
pub fn scaled_value(base: f64, effective_level: f64, per_level_factor: f64) -> f64 {
    base * (1.0 + (effective_level - 1.0) * per_level_factor)
}

//! Integration test: XP curve, level-ups and their side effects.
//!
//! Every level gained must pay out a passive point and push the world level,
//! and nothing may change for rejected grants.

use ascend::core::{cumulative_xp_for_level, xp_required, MAX_PLAYER_LEVEL};
use ascend::leveling::{add_xp, load_progress, save_progress, PlayerProgress};
use ascend::passives::PassivePointBalance;
use ascend::persistence::{KvStore, MemoryStore};
use ascend::world::WorldState;

fn fresh() -> (PlayerProgress, PassivePointBalance, WorldState) {
    (PlayerProgress::new(), PassivePointBalance::new(), WorldState::new())
}

// ============================================================================
// XP curve
// ============================================================================

#[test]
fn test_curve_first_levels() {
    assert_eq!(xp_required(1), 135);
    assert_eq!(xp_required(2), 190);
    assert_eq!(xp_required(3), 265);
    assert_eq!(cumulative_xp_for_level(1), 0);
    assert_eq!(cumulative_xp_for_level(4), 135 + 190 + 265);
}

#[test]
fn test_curve_strictly_increasing_below_cap() {
    for level in 1..MAX_PLAYER_LEVEL - 1 {
        assert!(xp_required(level + 1) > xp_required(level), "level {level}");
    }
}

// ============================================================================
// add_xp
// ============================================================================

#[test]
fn test_multi_level_grant_carries_remainder() {
    let (mut progress, mut points, mut world) = fresh();
    let report = add_xp(&mut progress, 135 + 190 + 10, &mut points, &mut world);

    assert_eq!(report.level_before, 1);
    assert_eq!(report.level_after, 3);
    assert_eq!(report.levels_gained(), 2);
    assert_eq!(progress.level(), 3);
    assert_eq!(progress.xp(), 10);
    assert_eq!(points.available(), 2);
    assert_eq!(points.total_earned(), 2);
    assert_eq!(world.level(), 3);
}

#[test]
fn test_exact_requirement_levels_with_zero_leftover() {
    let (mut progress, mut points, mut world) = fresh();
    add_xp(&mut progress, 135, &mut points, &mut world);
    assert_eq!(progress.level(), 2);
    assert_eq!(progress.xp(), 0);
}

#[test]
fn test_rejected_grants_change_nothing() {
    let (mut progress, mut points, mut world) = fresh();
    add_xp(&mut progress, 50, &mut points, &mut world);

    for amount in [0, -1, i64::MIN] {
        let report = add_xp(&mut progress, amount, &mut points, &mut world);
        assert_eq!(report.xp_applied, 0);
        assert!(!report.leveled_up());
    }
    assert_eq!(progress.xp(), 50);
    assert_eq!(points.available(), 0);
    assert_eq!(world.level(), 1);
}

#[test]
fn test_level_cap_stops_everything() {
    let (mut progress, mut points, mut world) = fresh();
    progress.set_level(MAX_PLAYER_LEVEL as i64 - 1);

    let report = add_xp(&mut progress, i64::MAX, &mut points, &mut world);
    assert_eq!(report.level_after, MAX_PLAYER_LEVEL);
    assert!(progress.is_max_level());
    assert_eq!(progress.xp(), 0);
    assert_eq!(points.available(), 1);

    let report = add_xp(&mut progress, 1000, &mut points, &mut world);
    assert_eq!(report.xp_applied, 0);
    assert_eq!(points.available(), 1);
    assert_eq!(progress.xp_to_next_level(), 0);
    assert_eq!(progress.xp_progress(), 1.0);
}

#[test]
fn test_world_level_follows_many_level_ups() {
    let (mut progress, mut points, mut world) = fresh();
    for _ in 0..20 {
        let needed = xp_required(progress.level()) as i64;
        add_xp(&mut progress, needed, &mut points, &mut world);
    }
    assert_eq!(progress.level(), 21);
    assert_eq!(points.total_earned(), 20);
    assert_eq!(world.level(), 21);
    assert_eq!(progress.total_xp(), cumulative_xp_for_level(21));
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_progress_survives_store_round_trip() {
    let (mut progress, mut points, mut world) = fresh();
    add_xp(&mut progress, 400, &mut points, &mut world);

    let mut store = MemoryStore::new();
    save_progress(&progress, &mut store);
    assert_eq!(load_progress(&store), progress);
}

#[test]
fn test_out_of_range_stored_progress_is_clamped() {
    let mut store = MemoryStore::new();
    store.set_int("PlayerLevel", 9_999);
    store.set_int("PlayerXP", -40);
    let progress = load_progress(&store);
    assert_eq!(progress.level(), MAX_PLAYER_LEVEL);
    assert_eq!(progress.xp(), 0);

    store.set_int("PlayerLevel", 2);
    store.set_int("PlayerXP", 10_000);
    let progress = load_progress(&store);
    assert_eq!(progress.level(), 2);
    assert_eq!(progress.xp(), xp_required(2) - 1);
}

use super::types::{LevelUpReport, PlayerProgress};
use crate::core::constants::{MAX_PLAYER_LEVEL, PASSIVE_POINTS_PER_LEVEL, WORLD_LEVELS_PER_PLAYER_LEVEL};
use crate::core::progression::xp_required;
use crate::passives::points::PassivePointBalance;
use crate::persistence::KvStore;
use crate::world::WorldState;

pub const KEY_PLAYER_LEVEL: &str = "PlayerLevel";
pub const KEY_PLAYER_XP: &str = "PlayerXP";

/// Grant XP and process every level-up it pays for.
///
/// Rejected (nothing changes) for `amount <= 0` or a capped player. Each
/// level gained awards a passive point and raises the world level by one.
pub fn add_xp(
    progress: &mut PlayerProgress,
    amount: i64,
    points: &mut PassivePointBalance,
    world: &mut WorldState,
) -> LevelUpReport {
    let level_before = progress.level;
    let mut report = LevelUpReport {
        xp_applied: 0,
        level_before,
        level_after: level_before,
    };
    if amount <= 0 || progress.is_max_level() {
        return report;
    }

    report.xp_applied = amount as u64;
    progress.xp = progress.xp.saturating_add(amount as u64);

    loop {
        let needed = xp_required(progress.level);
        if progress.level < MAX_PLAYER_LEVEL && progress.xp >= needed {
            progress.xp -= needed;
            progress.level += 1;
            on_level_up(progress.level, points, world);
        } else {
            break;
        }
    }

    // XP stops accumulating at the cap
    if progress.is_max_level() {
        progress.xp = 0;
    }

    report.level_after = progress.level;
    report
}

fn on_level_up(new_level: u32, points: &mut PassivePointBalance, world: &mut WorldState) {
    points.award(PASSIVE_POINTS_PER_LEVEL as i64);
    world.increase_world_level(WORLD_LEVELS_PER_PLAYER_LEVEL);
    tracing::info!(
        level = new_level,
        world_level = world.level(),
        available_points = points.available(),
        "player leveled up"
    );
}

/// Load progress, clamping anything out of range.
pub fn load_progress(store: &impl KvStore) -> PlayerProgress {
    let mut progress = PlayerProgress::new();
    progress.set_level(store.get_int(KEY_PLAYER_LEVEL, 1));
    progress.set_xp(store.get_int(KEY_PLAYER_XP, 0));
    progress
}

pub fn save_progress(progress: &PlayerProgress, store: &mut impl KvStore) {
    store.set_int(KEY_PLAYER_LEVEL, progress.level() as i64);
    store.set_int(KEY_PLAYER_XP, progress.xp().min(i64::MAX as u64) as i64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn fresh() -> (PlayerProgress, PassivePointBalance, WorldState) {
        (PlayerProgress::new(), PassivePointBalance::new(), WorldState::new())
    }

    #[test]
    fn test_first_level_up_exact() {
        let (mut p, mut points, mut world) = fresh();
        let report = add_xp(&mut p, 135, &mut points, &mut world);
        assert!(report.leveled_up());
        assert_eq!(p.level(), 2);
        assert_eq!(p.xp(), 0);
        assert_eq!(points.available(), 1);
        assert_eq!(world.level(), 2);
    }

    #[test]
    fn test_just_below_requirement() {
        let (mut p, mut points, mut world) = fresh();
        let report = add_xp(&mut p, 134, &mut points, &mut world);
        assert!(!report.leveled_up());
        assert_eq!(p.xp(), 134);
        assert_eq!(points.available(), 0);
        assert_eq!(world.level(), 1);
    }

    #[test]
    fn test_zero_and_negative_are_noops() {
        let (mut p, mut points, mut world) = fresh();
        assert!(!add_xp(&mut p, 0, &mut points, &mut world).leveled_up());
        assert!(!add_xp(&mut p, -5, &mut points, &mut world).leveled_up());
        assert_eq!(p, PlayerProgress::new());
        assert_eq!(add_xp(&mut p, -5, &mut points, &mut world).xp_applied, 0);
    }

    #[test]
    fn test_multi_level_grant() {
        let (mut p, mut points, mut world) = fresh();
        let grant = xp_required(1) + xp_required(2) + xp_required(3) + 7;
        let report = add_xp(&mut p, grant as i64, &mut points, &mut world);
        assert_eq!(report.levels_gained(), 3);
        assert_eq!(p.level(), 4);
        assert_eq!(p.xp(), 7);
        assert_eq!(points.available(), 3);
        assert_eq!(points.total_earned(), 3);
        assert_eq!(world.level(), 4);
    }

    #[test]
    fn test_xp_stays_below_requirement() {
        let (mut p, mut points, mut world) = fresh();
        for grant in [1, 50, 999, 12_345, 3, 77_777, 250_000] {
            add_xp(&mut p, grant, &mut points, &mut world);
            if !p.is_max_level() {
                assert!(p.xp() < xp_required(p.level()), "xp {} at level {}", p.xp(), p.level());
            }
        }
    }

    #[test]
    fn test_cap_stops_progress() {
        let (mut p, mut points, mut world) = fresh();
        let report = add_xp(&mut p, i64::MAX, &mut points, &mut world);
        assert_eq!(p.level(), MAX_PLAYER_LEVEL);
        assert_eq!(report.levels_gained(), MAX_PLAYER_LEVEL - 1);
        assert_eq!(points.total_earned(), MAX_PLAYER_LEVEL - 1);
        assert_eq!(p.xp(), 0);

        // Further grants are rejected
        let report = add_xp(&mut p, 1000, &mut points, &mut world);
        assert!(!report.leveled_up());
        assert_eq!(report.xp_applied, 0);
        assert_eq!(points.total_earned(), MAX_PLAYER_LEVEL - 1);
    }

    #[test]
    fn test_world_level_shared_between_players() {
        let mut world = WorldState::new();
        let (mut a, mut a_points) = (PlayerProgress::new(), PassivePointBalance::new());
        let (mut b, mut b_points) = (PlayerProgress::new(), PassivePointBalance::new());
        add_xp(&mut a, 135, &mut a_points, &mut world);
        add_xp(&mut b, 135, &mut b_points, &mut world);
        assert_eq!(world.level(), 3);
    }

    #[test]
    fn test_persistence_roundtrip() {
        let (mut p, mut points, mut world) = fresh();
        add_xp(&mut p, 500, &mut points, &mut world);
        let mut store = MemoryStore::new();
        save_progress(&p, &mut store);
        assert_eq!(load_progress(&store), p);
    }

    #[test]
    fn test_load_corrupt_xp_is_clamped() {
        let mut store = MemoryStore::new();
        store.set_int(KEY_PLAYER_LEVEL, 1);
        store.set_int(KEY_PLAYER_XP, 1_000_000);
        let p = load_progress(&store);
        assert!(p.xp() < xp_required(1));
    }
}

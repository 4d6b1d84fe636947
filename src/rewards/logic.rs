use crate::core::constants::{
    BASE_KILL_XP, BOSS_XP_MULTIPLIER, KILL_XP_PER_LEVEL, LEGACY_RARITY_XP_STEP,
};
use crate::enemy::{Enemy, EnemyState, PlayerId, PlayerTarget, SpawnSource};
use crate::leveling::{add_xp, LevelUpReport, PlayerProgress};
use crate::passives::PassivePointBalance;
use crate::world::WorldState;

/// XP paid out by one kill and who receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillReward {
    pub xp: u64,
    pub recipients: Vec<PlayerId>,
}

/// Friendly, town, critter and statue-spawned enemies pay nothing.
pub fn should_give_xp(enemy: &Enemy) -> bool {
    enemy.is_progression_eligible() && enemy.spawn_source != SpawnSource::Statue
}

/// Level-based XP before rarity and modifiers, truncated.
pub fn base_kill_xp(level: u32, enemy: &Enemy) -> u64 {
    let mut xp = BASE_KILL_XP * (1.0 + (level.max(1) - 1) as f64 * KILL_XP_PER_LEVEL);
    if enemy.is_boss() {
        xp *= BOSS_XP_MULTIPLIER;
    }
    if enemy.legacy_rarity > 0 {
        xp *= 1.0 + enemy.legacy_rarity as f64 * LEGACY_RARITY_XP_STEP;
    }
    xp as u64
}

/// Final XP for killing `enemy`, 0 if it pays nothing.
pub fn kill_xp(enemy: &Enemy, state: &EnemyState) -> u64 {
    if !should_give_xp(enemy) {
        return 0;
    }
    let base = base_kill_xp(state.level(), enemy);
    (base as f64 * state.total_xp_multiplier()) as u64
}

/// Active, living players strictly inside `radius` of the enemy.
pub fn recipients_in_range(enemy: &Enemy, players: &[PlayerTarget], radius: f32) -> Vec<PlayerId> {
    players
        .iter()
        .filter(|p| p.is_targetable() && p.position.distance(enemy.position) < radius)
        .map(|p| p.id)
        .collect()
}

/// Work out the payout for a kill. `None` when there is nothing to pay.
pub fn compute_kill_reward(
    enemy: &Enemy,
    state: &EnemyState,
    players: &[PlayerTarget],
    radius: f32,
) -> Option<KillReward> {
    let xp = kill_xp(enemy, state);
    if xp == 0 {
        return None;
    }
    Some(KillReward {
        xp,
        recipients: recipients_in_range(enemy, players, radius),
    })
}

/// Grant XP straight to one player. Skipped for inactive or dead players.
pub fn award_xp_to_player(
    target: &PlayerTarget,
    xp: u64,
    progress: &mut PlayerProgress,
    points: &mut PassivePointBalance,
    world: &mut WorldState,
) -> Option<LevelUpReport> {
    if xp == 0 || !target.is_targetable() {
        return None;
    }
    let amount = xp.min(i64::MAX as u64) as i64;
    Some(add_xp(progress, amount, points, world))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{EnemyRarity, EnemyRarityAssignment, Modifier, Vec2};

    fn state(level: u32, tier: EnemyRarity) -> EnemyState {
        EnemyState::new(
            level,
            EnemyRarityAssignment {
                tier,
                modifiers: vec![],
            },
            "Zombie",
        )
    }

    #[test]
    fn test_base_xp_scales_with_level() {
        let zombie = Enemy::new("Zombie", 100, 20, 5);
        assert_eq!(base_kill_xp(1, &zombie), 10);
        assert_eq!(base_kill_xp(5, &zombie), 50);

        let boss = Enemy::new("Eye", 3000, 30, 10).as_boss("eye_of_cthulhu");
        assert_eq!(base_kill_xp(3, &boss), 300);

        let mut legacy = Enemy::new("Pinky", 150, 20, 5);
        legacy.legacy_rarity = 2;
        assert_eq!(base_kill_xp(1, &legacy), 20);
    }

    #[test]
    fn test_kill_xp_applies_rarity_multiplier() {
        let zombie = Enemy::new("Zombie", 100, 20, 5);
        assert_eq!(kill_xp(&zombie, &state(1, EnemyRarity::Common)), 10);
        assert_eq!(kill_xp(&zombie, &state(1, EnemyRarity::Uncommon)), 13);
        assert_eq!(kill_xp(&zombie, &state(3, EnemyRarity::Mythic)), 90);

        let with_modifiers = EnemyState::new(
            2,
            EnemyRarityAssignment {
                tier: EnemyRarity::Rare,
                modifiers: vec![Modifier::Swift, Modifier::Brutal],
            },
            "Zombie",
        );
        assert_eq!(kill_xp(&zombie, &with_modifiers), 32);
    }

    #[test]
    fn test_farmable_enemies_pay_nothing() {
        let mut statue = Enemy::new("Skeleton", 100, 20, 5);
        statue.spawn_source = SpawnSource::Statue;
        assert!(!should_give_xp(&statue));
        assert_eq!(kill_xp(&statue, &state(10, EnemyRarity::Mythic)), 0);

        let critter = Enemy::new("Bird", 5, 0, 0);
        assert!(!should_give_xp(&critter));
    }

    #[test]
    fn test_recipients_in_range() {
        let enemy = Enemy::new("Zombie", 100, 20, 5).at(Vec2::new(100.0, 100.0));
        let near = PlayerTarget::new(PlayerId(0), Vec2::new(500.0, 100.0));
        let edge = PlayerTarget::new(PlayerId(1), Vec2::new(1100.0, 100.0));
        let mut dead = PlayerTarget::new(PlayerId(2), Vec2::new(100.0, 100.0));
        dead.dead = true;
        let mut afk = PlayerTarget::new(PlayerId(3), Vec2::new(100.0, 100.0));
        afk.active = false;

        assert_eq!(
            recipients_in_range(&enemy, &[near, edge, dead, afk], 1000.0),
            vec![PlayerId(0)]
        );
    }

    #[test]
    fn test_award_to_player() {
        let mut progress = PlayerProgress::new();
        let mut points = PassivePointBalance::new();
        let mut world = WorldState::new();
        let target = PlayerTarget::new(PlayerId(0), Vec2::ZERO);

        let report = award_xp_to_player(&target, 135, &mut progress, &mut points, &mut world);
        assert!(report.is_some_and(|r| r.leveled_up()));
        assert_eq!(progress.level(), 2);
        assert_eq!(points.available(), 1);
        assert_eq!(world.level(), 2);

        let mut dead = target;
        dead.dead = true;
        assert!(award_xp_to_player(&dead, 500, &mut progress, &mut points, &mut world).is_none());
        assert_eq!(progress.xp(), 0);
    }
}

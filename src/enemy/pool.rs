use super::bosses::BossKillTracker;
use super::modifiers::{Modifier, ModifierKind};
use super::types::{Biome, Enemy, PlayerTarget};
use crate::core::constants::BIOME_CHECK_RANGE;
use rand::Rng;

/// Biome of the first active player near the enemy, which is where it
/// counts as having spawned.
pub fn spawn_biome(enemy: &Enemy, players: &[PlayerTarget]) -> Option<Biome> {
    players
        .iter()
        .find(|p| p.active && enemy.position.distance(p.position) < BIOME_CHECK_RANGE)
        .map(|p| p.biome)
}

/// Whether a conditional modifier may roll for an enemy in `biome`.
pub fn is_eligible(kind: ModifierKind, biome: Option<Biome>, bosses: &BossKillTracker) -> bool {
    match kind {
        ModifierKind::VileSpit => bosses.evil_boss_defeated() || biome == Some(Biome::Corruption),
        ModifierKind::Leech => bosses.evil_boss_defeated() || biome == Some(Biome::Crimson),
        _ => true,
    }
}

/// Base catalog plus whichever conditional modifiers pass their gate.
pub fn eligible_pool(biome: Option<Biome>, bosses: &BossKillTracker) -> Vec<(ModifierKind, u32)> {
    ModifierKind::BASE
        .iter()
        .chain(ModifierKind::CONDITIONAL.iter())
        .filter(|kind| is_eligible(**kind, biome, bosses))
        .map(|kind| (*kind, kind.weight()))
        .collect()
}

/// Weighted selection without replacement. Stops early when the pool runs
/// dry or only zero-weight entries remain.
pub fn pick_weighted<T>(mut pool: Vec<(T, u32)>, count: usize, rng: &mut impl Rng) -> Vec<T> {
    let mut picked = Vec::with_capacity(count.min(pool.len()));

    while picked.len() < count && !pool.is_empty() {
        let total: u64 = pool.iter().map(|(_, w)| *w as u64).sum();
        if total == 0 {
            break;
        }

        let roll = rng.gen_range(0..total);
        let mut current = 0u64;
        let mut chosen = None;
        for (i, (_, weight)) in pool.iter().enumerate() {
            current += *weight as u64;
            if roll < current {
                chosen = Some(i);
                break;
            }
        }

        match chosen {
            Some(i) => picked.push(pool.remove(i).0),
            None => break,
        }
    }

    picked
}

/// Roll `count` distinct modifiers for an enemy and build fresh instances.
pub fn roll_modifiers(
    count: usize,
    enemy: &Enemy,
    players: &[PlayerTarget],
    bosses: &BossKillTracker,
    rng: &mut impl Rng,
) -> Vec<Modifier> {
    if count == 0 {
        return Vec::new();
    }
    let pool = eligible_pool(spawn_biome(enemy, players), bosses);
    pick_weighted(pool, count, rng)
        .into_iter()
        .map(Modifier::create)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::types::{PlayerId, Vec2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_zero_weight_never_selected() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            assert_eq!(pick_weighted(vec![("X", 100), ("Y", 0)], 1, &mut rng), vec!["X"]);
        }
    }

    #[test]
    fn test_zero_total_weight_picks_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let picked = pick_weighted(vec![("X", 100), ("Y", 0)], 2, &mut rng);
        assert_eq!(picked, vec!["X"]);
        assert!(pick_weighted::<&str>(vec![], 3, &mut rng).is_empty());
    }

    #[test]
    fn test_no_duplicates_and_capped_by_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let pool = eligible_pool(None, &BossKillTracker::new());
        assert_eq!(pool.len(), ModifierKind::BASE.len());

        let picked = pick_weighted(pool, 50, &mut rng);
        assert_eq!(picked.len(), ModifierKind::BASE.len());
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), picked.len());
    }

    #[test]
    fn test_weights_shape_selection() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut heavy = 0;
        for _ in 0..10_000 {
            if pick_weighted(vec![("heavy", 90), ("light", 10)], 1, &mut rng) == vec!["heavy"] {
                heavy += 1;
            }
        }
        assert!((8700..=9300).contains(&heavy), "heavy picked {heavy} of 10000");
    }

    #[test]
    fn test_same_seed_same_roll() {
        let enemy = Enemy::new("Zombie", 100, 20, 5);
        let bosses = BossKillTracker::new();
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        assert_eq!(
            roll_modifiers(3, &enemy, &[], &bosses, &mut a),
            roll_modifiers(3, &enemy, &[], &bosses, &mut b)
        );
    }

    #[test]
    fn test_biome_gates_conditional_modifiers() {
        let enemy = Enemy::new("Eater", 100, 20, 5);
        let bosses = BossKillTracker::new();

        let corrupt = PlayerTarget::new(PlayerId(0), Vec2::new(200.0, 0.0)).in_biome(Biome::Corruption);
        let biome = spawn_biome(&enemy, &[corrupt]);
        assert_eq!(biome, Some(Biome::Corruption));
        let kinds: Vec<_> = eligible_pool(biome, &bosses).into_iter().map(|(k, _)| k).collect();
        assert!(kinds.contains(&ModifierKind::VileSpit));
        assert!(!kinds.contains(&ModifierKind::Leech));

        // Too far away to count
        let distant = PlayerTarget::new(PlayerId(0), Vec2::new(1000.0, 0.0)).in_biome(Biome::Crimson);
        assert_eq!(spawn_biome(&enemy, &[distant]), None);
    }

    #[test]
    fn test_evil_boss_unlocks_everywhere() {
        let mut bosses = BossKillTracker::new();
        bosses.record_defeat("brain_of_cthulhu");
        let pool = eligible_pool(None, &bosses);
        assert_eq!(pool.len(), ModifierKind::BASE.len() + ModifierKind::CONDITIONAL.len());
    }
}

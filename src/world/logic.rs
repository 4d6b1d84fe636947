use super::types::WorldState;
use crate::persistence::KvStore;
use rand::Rng;

pub const KEY_WORLD_LEVEL: &str = "WorldLevel";
pub const KEY_WORLD_VARIANCE: &str = "WorldVariance";

/// Roll a uniform variance in `[min, max]` and store it (clamped).
///
/// Returns the variance actually stored.
pub fn apply_random_variance<R: Rng>(world: &mut WorldState, rng: &mut R, min: f64, max: f64) -> f64 {
    if !min.is_finite() || !max.is_finite() {
        return world.variance();
    }
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let rolled = if lo == hi { lo } else { rng.gen_range(lo..=hi) };
    world.set_variance(rolled);
    world.variance()
}

/// Load world scaling, falling back to defaults for missing keys.
pub fn load_world_state(store: &impl KvStore) -> WorldState {
    let mut world = WorldState::new();
    world.set_level(store.get_int(KEY_WORLD_LEVEL, world.level() as i64));
    world.set_variance(store.get_float(KEY_WORLD_VARIANCE, 0.0));
    world
}

pub fn save_world_state(world: &WorldState, store: &mut impl KvStore) {
    store.set_int(KEY_WORLD_LEVEL, world.level() as i64);
    store.set_float(KEY_WORLD_VARIANCE, world.variance());
}

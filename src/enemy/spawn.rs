//! Spawn-time setup of an enemy: level, level scaling, rarity and modifiers.

use super::bosses::BossKillTracker;
use super::modifiers::Modifier;
use super::pool::roll_modifiers;
use super::rarity::{roll_rarity, EnemyRarity, RarityInfo};
use super::types::{Enemy, PlayerTarget};
use crate::core::config::EngineConfig;
use crate::core::constants::{
    BOSS_MAX_MODIFIERS, BOSS_MIN_MODIFIERS, DISPLAY_NAME_MAX_PREFIXES, ENEMY_DAMAGE_PER_LEVEL_DIFF,
    ENEMY_DEFENSE_PER_LEVEL_DIFF, ENEMY_HEALTH_PER_LEVEL_DIFF, RARITY_DEFENSE_RATE,
};
use crate::world::WorldState;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Rarity tier and modifiers rolled for one enemy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnemyRarityAssignment {
    pub tier: EnemyRarity,
    pub modifiers: Vec<Modifier>,
}

/// Everything the engine attaches to a spawned enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    level: u32,
    assignment: EnemyRarityAssignment,
    display_name: String,
}

impl EnemyState {
    pub fn new(level: u32, assignment: EnemyRarityAssignment, base_name: &str) -> Self {
        let display_name = compose_display_name(base_name, &assignment);
        Self {
            level: level.max(1),
            assignment,
            display_name,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn rarity(&self) -> EnemyRarity {
        self.assignment.tier
    }

    pub fn rarity_info(&self) -> RarityInfo {
        self.assignment.tier.info()
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.assignment.modifiers
    }

    /// Hooks need mutable access for per-instance timers.
    pub fn modifiers_mut(&mut self) -> &mut [Modifier] {
        &mut self.assignment.modifiers
    }

    pub fn assignment(&self) -> &EnemyRarityAssignment {
        &self.assignment
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Rarity XP multiplier plus each modifier's bonus.
    pub fn total_xp_multiplier(&self) -> f64 {
        self.rarity_info().xp_multiplier
            + self
                .assignment
                .modifiers
                .iter()
                .map(Modifier::xp_bonus)
                .sum::<f64>()
    }
}

/// `[Rarity] [Prefix] [Prefix] Name`, skipping empty parts.
pub fn compose_display_name(base_name: &str, assignment: &EnemyRarityAssignment) -> String {
    let rarity_name = assignment.tier.info().name;
    let mut parts: Vec<&str> = Vec::with_capacity(DISPLAY_NAME_MAX_PREFIXES + 2);
    if !rarity_name.is_empty() {
        parts.push(rarity_name);
    }
    for modifier in assignment.modifiers.iter().take(DISPLAY_NAME_MAX_PREFIXES) {
        parts.push(modifier.prefix());
    }
    parts.push(base_name);
    parts.join(" ")
}

/// Level near the world level most of the time, otherwise a few levels above it.
pub fn roll_enemy_level(world: &WorldState, config: &EngineConfig, rng: &mut impl Rng) -> u32 {
    let base = world.level() as i64;
    let offset = if rng.gen_bool(config.near_level_probability()) {
        let spread = config.enemy_level_near_spread.saturating_abs();
        rng.gen_range(-spread..=spread)
    } else {
        let (lo, hi) = config.enemy_level_far_offset;
        rng.gen_range(lo.min(hi)..=hi.max(lo))
    };
    base.saturating_add(offset).clamp(1, u32::MAX as i64) as u32
}

/// Scale health and damage by the world multipliers and the enemy's distance
/// from level 1. Health never drops below 1.
pub fn apply_level_scaling(enemy: &mut Enemy, level: u32, world: &WorldState) {
    let diff = level.saturating_sub(1) as f64;

    let health = enemy.life_max as f64 * world.health_multiplier() * (1.0 + diff * ENEMY_HEALTH_PER_LEVEL_DIFF);
    enemy.life_max = (health as i32).max(1);
    enemy.life = enemy.life_max;

    let damage = enemy.damage as f64 * world.damage_multiplier() * (1.0 + diff * ENEMY_DAMAGE_PER_LEVEL_DIFF);
    enemy.damage = (damage as i32).max(0);

    let defense = enemy.defense as f64 * (1.0 + diff * ENEMY_DEFENSE_PER_LEVEL_DIFF);
    enemy.defense = (defense as i32).max(0);
}

/// Health and damage by the tier multiplier, defense at half the rate.
/// Common leaves the enemy untouched.
pub fn apply_rarity_stats(enemy: &mut Enemy, info: &RarityInfo) {
    if info.stat_multiplier <= 1.0 {
        return;
    }
    enemy.life_max = ((enemy.life_max as f64 * info.stat_multiplier) as i32).max(1);
    enemy.life = enemy.life_max;
    enemy.damage = (enemy.damage as f64 * info.stat_multiplier) as i32;
    enemy.defense =
        (enemy.defense as f64 * (1.0 + (info.stat_multiplier - 1.0) * RARITY_DEFENSE_RATE)) as i32;
}

/// How many modifiers an enemy of this tier gets.
pub fn roll_modifier_count(
    enemy: &Enemy,
    info: &RarityInfo,
    bosses: &BossKillTracker,
    rng: &mut impl Rng,
) -> usize {
    match &enemy.boss_id {
        // A boss fights plain until it has been beaten once
        Some(id) if !bosses.is_defeated(id) => 0,
        Some(_) => rng.gen_range(BOSS_MIN_MODIFIERS..=BOSS_MAX_MODIFIERS),
        None if info.max_modifiers == 0 => 0,
        None => rng.gen_range(1..=info.max_modifiers),
    }
}

/// Full spawn pipeline. Returns `None` for friendly, town and critter enemies,
/// which are left untouched.
pub fn initialize_enemy(
    enemy: &mut Enemy,
    world: &WorldState,
    bosses: &BossKillTracker,
    players: &[PlayerTarget],
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Option<EnemyState> {
    if !enemy.is_progression_eligible() {
        return None;
    }

    let level = roll_enemy_level(world, config, rng);
    apply_level_scaling(enemy, level, world);

    let tier = roll_rarity(rng);
    let info = tier.info();
    apply_rarity_stats(enemy, &info);

    let count = roll_modifier_count(enemy, &info, bosses, rng);
    let modifiers = roll_modifiers(count, enemy, players, bosses, rng);
    for modifier in &modifiers {
        modifier.apply(enemy);
    }

    let state = EnemyState::new(level, EnemyRarityAssignment { tier, modifiers }, &enemy.base_name);
    if tier >= EnemyRarity::Rare {
        tracing::debug!(
            name = state.display_name(),
            level,
            rarity = tier.name(),
            "rare enemy spawned"
        );
    }
    Some(state)
}

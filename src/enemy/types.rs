//! Host-facing actor views used by the spawn, modifier and reward code.

use serde::{Deserialize, Serialize};

/// 2D world position or velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(&self) -> Vec2 {
        let len = (self.x * self.x + self.y * self.y).sqrt();
        if len <= f32::EPSILON {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / len, self.y / len)
        }
    }

    pub fn scale(&self, factor: f32) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }
}

/// Biome tags that gate conditional modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Biome {
    #[default]
    Neutral,
    Corruption,
    Crimson,
}

/// How an enemy entered the world. Statue spawns never pay out XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnSource {
    #[default]
    Natural,
    Statue,
}

/// Host-side player handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Snapshot of a player that enemy hooks may target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTarget {
    pub id: PlayerId,
    pub position: Vec2,
    pub active: bool,
    pub dead: bool,
    pub biome: Biome,
}

impl PlayerTarget {
    pub fn new(id: PlayerId, position: Vec2) -> Self {
        Self {
            id,
            position,
            active: true,
            dead: false,
            biome: Biome::Neutral,
        }
    }

    pub fn in_biome(mut self, biome: Biome) -> Self {
        self.biome = biome;
        self
    }

    /// Active and alive.
    pub fn is_targetable(&self) -> bool {
        self.active && !self.dead
    }
}

/// Numeric fields of a host enemy the engine reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub base_name: String,
    pub life: i32,
    pub life_max: i32,
    pub damage: i32,
    pub defense: i32,
    pub knockback_resist: f32,
    pub velocity: Vec2,
    /// Regen accumulated this tick; the host resets it before hooks run
    pub life_regen: i32,
    pub position: Vec2,
    pub friendly: bool,
    pub town: bool,
    /// Tracking id for bosses, `None` for regular enemies
    pub boss_id: Option<String>,
    /// Rarity tier set by the host's own loot system, 0 if none
    #[serde(default)]
    pub legacy_rarity: u32,
    #[serde(default)]
    pub spawn_source: SpawnSource,
}

impl Enemy {
    pub fn new(name: &str, life_max: i32, damage: i32, defense: i32) -> Self {
        Self {
            base_name: name.to_string(),
            life: life_max,
            life_max,
            damage,
            defense,
            knockback_resist: 1.0,
            velocity: Vec2::ZERO,
            life_regen: 0,
            position: Vec2::ZERO,
            friendly: false,
            town: false,
            boss_id: None,
            legacy_rarity: 0,
            spawn_source: SpawnSource::Natural,
        }
    }

    pub fn as_boss(mut self, boss_id: &str) -> Self {
        self.boss_id = Some(boss_id.to_string());
        self
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn is_boss(&self) -> bool {
        self.boss_id.is_some()
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Friendly, town and critter-sized enemies get no rarity, level or XP.
    pub fn is_progression_eligible(&self) -> bool {
        !self.friendly
            && !self.town
            && self.life_max > crate::core::constants::TRIVIAL_ENEMY_MAX_LIFE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_and_normalize() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        let n = b.normalized();
        assert!((n.x - 0.6).abs() < 1e-6 && (n.y - 0.8).abs() < 1e-6);
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn test_enemy_eligibility() {
        assert!(Enemy::new("Zombie", 45, 14, 6).is_progression_eligible());
        assert!(!Enemy::new("Bunny", 5, 0, 0).is_progression_eligible());

        let mut guide = Enemy::new("Guide", 250, 10, 15);
        guide.town = true;
        assert!(!guide.is_progression_eligible());

        let mut ally = Enemy::new("Ally", 100, 10, 0);
        ally.friendly = true;
        assert!(!ally.is_progression_eligible());
    }

    #[test]
    fn test_player_targetable() {
        let mut p = PlayerTarget::new(PlayerId(0), Vec2::ZERO);
        assert!(p.is_targetable());
        p.dead = true;
        assert!(!p.is_targetable());
    }
}

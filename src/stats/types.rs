//! Live stat block and the fixed stat-name lookup table.

use crate::core::constants::{MAX_ENDURANCE, VITALITY_LIFE_PER_POINT};
use serde::{Deserialize, Serialize};

/// Damage categories a player can scale independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DamageClass {
    Melee,
    Ranged,
    Magic,
    Summon,
    Generic,
}

impl DamageClass {
    pub const ALL: [DamageClass; 5] = [
        DamageClass::Melee,
        DamageClass::Ranged,
        DamageClass::Magic,
        DamageClass::Summon,
        DamageClass::Generic,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Flat damage added to a class, and the multiplier applied on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageModifier {
    pub flat: f64,
    pub multiplier: f64,
}

impl Default for DamageModifier {
    fn default() -> Self {
        Self {
            flat: 0.0,
            multiplier: 1.0,
        }
    }
}

/// The numeric fields of a player actor the ledger is allowed to touch.
///
/// Multipliers start at 1.0, additive stats at 0.0. The host keeps one
/// baseline copy and one live copy per player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub damage: [DamageModifier; 5],
    pub crit_chance: f64,
    pub crit_damage: f64,
    pub attack_speed: f64,
    pub armor_penetration: f64,
    pub max_minions: f64,
    pub mana_cost: f64,
    pub mana_regen: f64,
    pub max_mana: f64,
    pub defense: f64,
    pub endurance: f64,
    pub life_regen: f64,
    pub max_life: f64,
    pub move_speed: f64,
    pub knockback: f64,
    pub projectile_speed: f64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            damage: [DamageModifier::default(); 5],
            crit_chance: 4.0,
            crit_damage: 1.0,
            attack_speed: 1.0,
            armor_penetration: 0.0,
            max_minions: 1.0,
            mana_cost: 1.0,
            mana_regen: 0.0,
            max_mana: 20.0,
            defense: 0.0,
            endurance: 0.0,
            life_regen: 0.0,
            max_life: 100.0,
            move_speed: 1.0,
            knockback: 1.0,
            projectile_speed: 1.0,
        }
    }
}

impl PlayerStats {
    pub fn damage(&self, class: DamageClass) -> &DamageModifier {
        &self.damage[class.index()]
    }

    pub fn damage_mut(&mut self, class: DamageClass) -> &mut DamageModifier {
        &mut self.damage[class.index()]
    }
}

/// Stat names that tree definitions and permanent bonuses may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatKind {
    MeleeDamage,
    RangedDamage,
    MagicDamage,
    SummonDamage,
    GenericDamage,
    CritChance,
    CritDamage,
    AttackSpeed,
    ArmorPenetration,
    MinionSlots,
    ManaEfficiency,
    ManaRegen,
    MaxMana,
    Defense,
    Endurance,
    LifeRegen,
    Vitality,
    MovementSpeed,
    Knockback,
    ProjectileSpeed,
}

impl StatKind {
    pub const ALL: [StatKind; 20] = [
        StatKind::MeleeDamage,
        StatKind::RangedDamage,
        StatKind::MagicDamage,
        StatKind::SummonDamage,
        StatKind::GenericDamage,
        StatKind::CritChance,
        StatKind::CritDamage,
        StatKind::AttackSpeed,
        StatKind::ArmorPenetration,
        StatKind::MinionSlots,
        StatKind::ManaEfficiency,
        StatKind::ManaRegen,
        StatKind::MaxMana,
        StatKind::Defense,
        StatKind::Endurance,
        StatKind::LifeRegen,
        StatKind::Vitality,
        StatKind::MovementSpeed,
        StatKind::Knockback,
        StatKind::ProjectileSpeed,
    ];

    /// Key used in tree definitions and persistence
    pub fn name(&self) -> &'static str {
        match self {
            StatKind::MeleeDamage => "MeleeDamage",
            StatKind::RangedDamage => "RangedDamage",
            StatKind::MagicDamage => "MagicDamage",
            StatKind::SummonDamage => "SummonDamage",
            StatKind::GenericDamage => "GenericDamage",
            StatKind::CritChance => "CritChance",
            StatKind::CritDamage => "CritDamage",
            StatKind::AttackSpeed => "AttackSpeed",
            StatKind::ArmorPenetration => "ArmorPenetration",
            StatKind::MinionSlots => "MinionSlots",
            StatKind::ManaEfficiency => "ManaEfficiency",
            StatKind::ManaRegen => "ManaRegen",
            StatKind::MaxMana => "MaxMana",
            StatKind::Defense => "Defense",
            StatKind::Endurance => "Endurance",
            StatKind::LifeRegen => "LifeRegen",
            StatKind::Vitality => "Vitality",
            StatKind::MovementSpeed => "MovementSpeed",
            StatKind::Knockback => "Knockback",
            StatKind::ProjectileSpeed => "ProjectileSpeed",
        }
    }

    pub fn from_name(name: &str) -> Option<StatKind> {
        StatKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    fn damage_class(&self) -> Option<DamageClass> {
        match self {
            StatKind::MeleeDamage => Some(DamageClass::Melee),
            StatKind::RangedDamage => Some(DamageClass::Ranged),
            StatKind::MagicDamage => Some(DamageClass::Magic),
            StatKind::SummonDamage => Some(DamageClass::Summon),
            StatKind::GenericDamage => Some(DamageClass::Generic),
            _ => None,
        }
    }

    /// Additive stat field for the kinds that add and multiply the same value.
    fn plain_field<'a>(&self, stats: &'a mut PlayerStats) -> Option<&'a mut f64> {
        match self {
            StatKind::CritChance => Some(&mut stats.crit_chance),
            StatKind::CritDamage => Some(&mut stats.crit_damage),
            StatKind::AttackSpeed => Some(&mut stats.attack_speed),
            StatKind::ArmorPenetration => Some(&mut stats.armor_penetration),
            StatKind::MinionSlots => Some(&mut stats.max_minions),
            StatKind::ManaRegen => Some(&mut stats.mana_regen),
            StatKind::MaxMana => Some(&mut stats.max_mana),
            StatKind::Defense => Some(&mut stats.defense),
            StatKind::LifeRegen => Some(&mut stats.life_regen),
            StatKind::MovementSpeed => Some(&mut stats.move_speed),
            StatKind::Knockback => Some(&mut stats.knockback),
            StatKind::ProjectileSpeed => Some(&mut stats.projectile_speed),
            _ => None,
        }
    }

    /// Apply a flat bonus of `value` to the live stat block.
    pub fn apply_flat(&self, stats: &mut PlayerStats, value: f64) {
        if let Some(class) = self.damage_class() {
            stats.damage_mut(class).flat += value;
            return;
        }
        match self {
            StatKind::ManaEfficiency => stats.mana_cost = (stats.mana_cost - value).max(0.0),
            StatKind::Endurance => {
                stats.endurance = (stats.endurance + value).min(MAX_ENDURANCE);
            }
            StatKind::Vitality => stats.max_life += value * VITALITY_LIFE_PER_POINT,
            _ => {
                if let Some(field) = self.plain_field(stats) {
                    *field += value;
                }
            }
        }
    }

    /// Apply a percent bonus (0.10 = +10%) to the live stat block.
    pub fn apply_percent(&self, stats: &mut PlayerStats, percent: f64) {
        if let Some(class) = self.damage_class() {
            stats.damage_mut(class).multiplier *= 1.0 + percent;
            return;
        }
        match self {
            StatKind::ManaEfficiency => stats.mana_cost = (stats.mana_cost - percent).max(0.0),
            // Damage reduction is already a fraction, so percent points add
            StatKind::Endurance => {
                stats.endurance = (stats.endurance + percent).min(MAX_ENDURANCE);
            }
            StatKind::Vitality => stats.max_life *= 1.0 + percent,
            _ => {
                if let Some(field) = self.plain_field(stats) {
                    *field *= 1.0 + percent;
                }
            }
        }
    }
}

/// "MeleeDamage" -> "Melee Damage"
pub fn format_stat_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

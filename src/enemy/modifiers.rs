//! Enemy modifier catalog and its hook points.
//!
//! A modifier can act at five points: once at spawn (`apply`), when a player
//! hits the enemy (`on_hit`), every tick (`update`), during the life regen
//! pass (`update_life_regen`) and when the enemy dies (`on_kill`). Hooks never
//! touch players directly. Anything aimed at a player comes back as a
//! [`ModifierEffect`] for the host to carry out.

use super::types::{Enemy, PlayerId, PlayerTarget, Vec2};
use crate::core::constants::{
    BRUTAL_DAMAGE_MULT, EXPLOSIVE_DAMAGE_DIVISOR, EXPLOSIVE_RADIUS, JUGGERNAUT_LIFE_MULT,
    LEECH_HEAL_DIVISOR, REGENERATING_LIFE_REGEN, SWIFT_VELOCITY_MULT, TOUGH_DEFENSE_MULT,
    TOUGH_KNOCKBACK_RESIST_MULT, VILE_SPIT_DAMAGE_DIVISOR, VILE_SPIT_INTERVAL_TICKS,
    VILE_SPIT_RANGE, VILE_SPIT_SPEED,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModifierKind {
    Swift,
    Tough,
    Regenerating,
    Venomous,
    Explosive,
    Juggernaut,
    Weakening,
    Draining,
    Bleeding,
    Igniting,
    Chilling,
    Shocking,
    Brutal,
    // Conditional
    VileSpit,
    Leech,
}

impl ModifierKind {
    /// Always eligible, in pool order.
    pub const BASE: [ModifierKind; 13] = [
        ModifierKind::Swift,
        ModifierKind::Tough,
        ModifierKind::Regenerating,
        ModifierKind::Venomous,
        ModifierKind::Explosive,
        ModifierKind::Juggernaut,
        ModifierKind::Weakening,
        ModifierKind::Draining,
        ModifierKind::Bleeding,
        ModifierKind::Igniting,
        ModifierKind::Chilling,
        ModifierKind::Shocking,
        ModifierKind::Brutal,
    ];

    /// Eligible only when their gate passes, appended after the base pool.
    pub const CONDITIONAL: [ModifierKind; 2] = [ModifierKind::VileSpit, ModifierKind::Leech];

    pub fn prefix(&self) -> &'static str {
        match self {
            ModifierKind::Swift => "Swift",
            ModifierKind::Tough => "Tough",
            ModifierKind::Regenerating => "Regenerating",
            ModifierKind::Venomous => "Venomous",
            ModifierKind::Explosive => "Explosive",
            ModifierKind::Juggernaut => "Juggernaut",
            ModifierKind::Weakening => "Weakening",
            ModifierKind::Draining => "Draining",
            ModifierKind::Bleeding => "Bleeding",
            ModifierKind::Igniting => "Igniting",
            ModifierKind::Chilling => "Chilling",
            ModifierKind::Shocking => "Shocking",
            ModifierKind::Brutal => "Brutal",
            ModifierKind::VileSpit => "Vile",
            ModifierKind::Leech => "Leeching",
        }
    }

    /// Relative spawn weight in the modifier pool.
    pub fn weight(&self) -> u32 {
        match self {
            ModifierKind::Swift | ModifierKind::Tough => 100,
            ModifierKind::Juggernaut => 80,
            ModifierKind::Regenerating => 75,
            ModifierKind::Weakening | ModifierKind::Draining => 70,
            ModifierKind::Bleeding | ModifierKind::Brutal => 65,
            ModifierKind::Venomous | ModifierKind::Igniting | ModifierKind::Chilling => 60,
            ModifierKind::Shocking => 55,
            ModifierKind::Explosive => 50,
            ModifierKind::Leech => 45,
            ModifierKind::VileSpit => 40,
        }
    }

    /// Extra XP multiplier on top of the rarity's. No catalog entry pays one yet.
    pub fn xp_bonus(&self) -> f64 {
        0.0
    }

    pub fn is_conditional(&self) -> bool {
        ModifierKind::CONDITIONAL.contains(self)
    }
}

/// Player debuffs applied by on-hit modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Debuff {
    Poisoned,
    BrokenArmor,
    Bleeding,
    OnFire,
    Chilled,
    Electrified,
}

impl Debuff {
    pub fn name(&self) -> &'static str {
        match self {
            Debuff::Poisoned => "Poisoned",
            Debuff::BrokenArmor => "Broken Armor",
            Debuff::Bleeding => "Bleeding",
            Debuff::OnFire => "On Fire",
            Debuff::Chilled => "Chilled",
            Debuff::Electrified => "Electrified",
        }
    }
}

/// Something a modifier asks the host to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModifierEffect {
    DebuffPlayer {
        player: PlayerId,
        debuff: Debuff,
        duration_ticks: u32,
    },
    /// The enemy already healed itself; reported for combat text
    EnemyHealed { amount: i32 },
    SpawnProjectile {
        target: PlayerId,
        origin: Vec2,
        velocity: Vec2,
        damage: i32,
    },
    DamagePlayer { player: PlayerId, damage: i32 },
}

/// A live modifier attached to one enemy. Only Vile Spit carries state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    Swift,
    Tough,
    Regenerating,
    Venomous,
    Explosive,
    Juggernaut,
    Weakening,
    Draining,
    Bleeding,
    Igniting,
    Chilling,
    Shocking,
    Brutal,
    VileSpit { shoot_timer: u32 },
    Leech,
}

impl Modifier {
    /// Fresh instance for one enemy.
    pub fn create(kind: ModifierKind) -> Modifier {
        match kind {
            ModifierKind::Swift => Modifier::Swift,
            ModifierKind::Tough => Modifier::Tough,
            ModifierKind::Regenerating => Modifier::Regenerating,
            ModifierKind::Venomous => Modifier::Venomous,
            ModifierKind::Explosive => Modifier::Explosive,
            ModifierKind::Juggernaut => Modifier::Juggernaut,
            ModifierKind::Weakening => Modifier::Weakening,
            ModifierKind::Draining => Modifier::Draining,
            ModifierKind::Bleeding => Modifier::Bleeding,
            ModifierKind::Igniting => Modifier::Igniting,
            ModifierKind::Chilling => Modifier::Chilling,
            ModifierKind::Shocking => Modifier::Shocking,
            ModifierKind::Brutal => Modifier::Brutal,
            ModifierKind::VileSpit => Modifier::VileSpit { shoot_timer: 0 },
            ModifierKind::Leech => Modifier::Leech,
        }
    }

    pub fn kind(&self) -> ModifierKind {
        match self {
            Modifier::Swift => ModifierKind::Swift,
            Modifier::Tough => ModifierKind::Tough,
            Modifier::Regenerating => ModifierKind::Regenerating,
            Modifier::Venomous => ModifierKind::Venomous,
            Modifier::Explosive => ModifierKind::Explosive,
            Modifier::Juggernaut => ModifierKind::Juggernaut,
            Modifier::Weakening => ModifierKind::Weakening,
            Modifier::Draining => ModifierKind::Draining,
            Modifier::Bleeding => ModifierKind::Bleeding,
            Modifier::Igniting => ModifierKind::Igniting,
            Modifier::Chilling => ModifierKind::Chilling,
            Modifier::Shocking => ModifierKind::Shocking,
            Modifier::Brutal => ModifierKind::Brutal,
            Modifier::VileSpit { .. } => ModifierKind::VileSpit,
            Modifier::Leech => ModifierKind::Leech,
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.kind().prefix()
    }

    pub fn xp_bonus(&self) -> f64 {
        self.kind().xp_bonus()
    }

    /// One-time stat changes at spawn.
    pub fn apply(&self, enemy: &mut Enemy) {
        match self {
            Modifier::Swift => {
                enemy.velocity = enemy.velocity.scale(SWIFT_VELOCITY_MULT);
            }
            Modifier::Tough => {
                enemy.defense = (enemy.defense as f64 * TOUGH_DEFENSE_MULT) as i32;
                enemy.knockback_resist *= TOUGH_KNOCKBACK_RESIST_MULT;
            }
            Modifier::Juggernaut => {
                enemy.life_max = enemy.life_max.saturating_mul(JUGGERNAUT_LIFE_MULT);
                enemy.life = enemy.life_max;
            }
            Modifier::Brutal => {
                enemy.damage = (enemy.damage as f64 * BRUTAL_DAMAGE_MULT) as i32;
            }
            _ => {}
        }
    }

    fn on_hit_debuff(&self) -> Option<(Debuff, u32)> {
        match self {
            Modifier::Venomous => Some((Debuff::Poisoned, 300)),
            Modifier::Weakening => Some((Debuff::BrokenArmor, 480)),
            Modifier::Draining => Some((Debuff::Bleeding, 600)),
            Modifier::Bleeding => Some((Debuff::Bleeding, 900)),
            Modifier::Igniting => Some((Debuff::OnFire, 420)),
            Modifier::Chilling => Some((Debuff::Chilled, 360)),
            Modifier::Shocking => Some((Debuff::Electrified, 300)),
            _ => None,
        }
    }

    /// Called when `attacker` hits the enemy.
    pub fn on_hit(&self, enemy: &mut Enemy, attacker: &PlayerTarget) -> Option<ModifierEffect> {
        if let Some((debuff, duration_ticks)) = self.on_hit_debuff() {
            return Some(ModifierEffect::DebuffPlayer {
                player: attacker.id,
                debuff,
                duration_ticks,
            });
        }

        if let Modifier::Leech = self {
            let heal = enemy.damage / LEECH_HEAL_DIVISOR;
            if heal > 0 {
                enemy.life = enemy.life.saturating_add(heal).min(enemy.life_max);
                return Some(ModifierEffect::EnemyHealed { amount: heal });
            }
        }

        None
    }

    /// Per-tick behaviour. Vile Spit fires at the nearest live player in
    /// range once its timer fills, and the timer restarts even with no target.
    pub fn update(&mut self, enemy: &Enemy, players: &[PlayerTarget]) -> Option<ModifierEffect> {
        let Modifier::VileSpit { shoot_timer } = self else {
            return None;
        };

        *shoot_timer += 1;
        if *shoot_timer < VILE_SPIT_INTERVAL_TICKS {
            return None;
        }
        *shoot_timer = 0;

        let mut target: Option<&PlayerTarget> = None;
        let mut nearest = VILE_SPIT_RANGE;
        for player in players.iter().filter(|p| p.is_targetable()) {
            let distance = enemy.position.distance(player.position);
            if distance < nearest {
                nearest = distance;
                target = Some(player);
            }
        }

        target.map(|player| {
            let direction = Vec2::new(
                player.position.x - enemy.position.x,
                player.position.y - enemy.position.y,
            );
            ModifierEffect::SpawnProjectile {
                target: player.id,
                origin: enemy.position,
                velocity: direction.normalized().scale(VILE_SPIT_SPEED),
                damage: enemy.damage / VILE_SPIT_DAMAGE_DIVISOR,
            }
        })
    }

    pub fn update_life_regen(&self, enemy: &mut Enemy) {
        if let Modifier::Regenerating = self {
            enemy.life_regen = enemy.life_regen.saturating_add(REGENERATING_LIFE_REGEN);
        }
    }

    pub fn on_kill(&self, enemy: &Enemy, players: &[PlayerTarget]) -> Vec<ModifierEffect> {
        if !matches!(self, Modifier::Explosive) {
            return Vec::new();
        }

        let damage = enemy.damage / EXPLOSIVE_DAMAGE_DIVISOR;
        players
            .iter()
            .filter(|p| p.is_targetable() && p.position.distance(enemy.position) < EXPLOSIVE_RADIUS)
            .map(|p| ModifierEffect::DamagePlayer {
                player: p.id,
                damage,
            })
            .collect()
    }
}

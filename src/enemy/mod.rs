//! Enemy rarity, level scaling and the modifier engine.

pub mod bosses;
pub mod modifiers;
pub mod pool;
pub mod rarity;
pub mod spawn;
pub mod types;

pub use bosses::BossKillTracker;
pub use modifiers::{Debuff, Modifier, ModifierEffect, ModifierKind};
pub use rarity::{roll_rarity, EnemyRarity, RarityInfo};
pub use spawn::{initialize_enemy, EnemyRarityAssignment, EnemyState};
pub use types::*;

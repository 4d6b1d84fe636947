use serde::{Deserialize, Serialize};
use rand::Rng;

/// Six quality bands for enemies, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum EnemyRarity {
    #[default]
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Epic = 3,
    Legendary = 4,
    Mythic = 5,
}

/// Fixed tuning for one rarity tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RarityInfo {
    /// Name shown before the enemy's name, empty for Common
    pub name: &'static str,
    pub color: (u8, u8, u8),
    pub stat_multiplier: f64,
    pub drop_chance_multiplier: f64,
    pub drop_quantity_multiplier: f64,
    pub xp_multiplier: f64,
    pub spawn_chance: f64,
    pub max_modifiers: usize,
}

impl EnemyRarity {
    pub const ALL: [EnemyRarity; 6] = [
        EnemyRarity::Common,
        EnemyRarity::Uncommon,
        EnemyRarity::Rare,
        EnemyRarity::Epic,
        EnemyRarity::Legendary,
        EnemyRarity::Mythic,
    ];

    pub fn index(&self) -> u32 {
        *self as u32
    }

    /// Unknown indices fall back to Common.
    pub fn from_index(index: u32) -> EnemyRarity {
        EnemyRarity::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(EnemyRarity::Common)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnemyRarity::Common => "Common",
            EnemyRarity::Uncommon => "Uncommon",
            EnemyRarity::Rare => "Rare",
            EnemyRarity::Epic => "Epic",
            EnemyRarity::Legendary => "Legendary",
            EnemyRarity::Mythic => "Mythic",
        }
    }

    pub fn info(&self) -> RarityInfo {
        match self {
            EnemyRarity::Common => RarityInfo {
                name: "",
                color: (255, 255, 255),
                stat_multiplier: 1.0,
                drop_chance_multiplier: 1.0,
                drop_quantity_multiplier: 1.0,
                xp_multiplier: 1.0,
                spawn_chance: 0.70,
                max_modifiers: 0,
            },
            EnemyRarity::Uncommon => RarityInfo {
                name: "Uncommon",
                color: (100, 255, 100),
                stat_multiplier: 1.3,
                drop_chance_multiplier: 1.2,
                drop_quantity_multiplier: 1.2,
                xp_multiplier: 1.3,
                spawn_chance: 0.20,
                max_modifiers: 1,
            },
            EnemyRarity::Rare => RarityInfo {
                name: "Rare",
                color: (100, 150, 255),
                stat_multiplier: 1.6,
                drop_chance_multiplier: 1.5,
                drop_quantity_multiplier: 1.5,
                xp_multiplier: 1.6,
                spawn_chance: 0.07,
                max_modifiers: 2,
            },
            EnemyRarity::Epic => RarityInfo {
                name: "Epic",
                color: (200, 100, 255),
                stat_multiplier: 2.0,
                drop_chance_multiplier: 2.0,
                drop_quantity_multiplier: 2.0,
                xp_multiplier: 2.0,
                spawn_chance: 0.02,
                max_modifiers: 3,
            },
            EnemyRarity::Legendary => RarityInfo {
                name: "Legendary",
                color: (255, 165, 0),
                stat_multiplier: 2.5,
                drop_chance_multiplier: 2.5,
                drop_quantity_multiplier: 2.5,
                xp_multiplier: 2.5,
                spawn_chance: 0.008,
                max_modifiers: 4,
            },
            EnemyRarity::Mythic => RarityInfo {
                name: "Mythic",
                color: (255, 50, 50),
                stat_multiplier: 3.0,
                drop_chance_multiplier: 3.0,
                drop_quantity_multiplier: 3.0,
                xp_multiplier: 3.0,
                spawn_chance: 0.002,
                max_modifiers: 5,
            },
        }
    }
}

/// Inverse-CDF roll walking from Mythic down to Common.
pub fn roll_rarity(rng: &mut impl Rng) -> EnemyRarity {
    let roll = rng.gen::<f64>();
    let mut cumulative = 0.0;

    for rarity in EnemyRarity::ALL.iter().rev() {
        cumulative += rarity.info().spawn_chance;
        if roll < cumulative {
            return *rarity;
        }
    }

    // Rounding left a sliver above the summed chances
    EnemyRarity::Common
}

// XP curve: A + B*level + C*level^2
pub const XP_CURVE_A: u64 = 100;
pub const XP_CURVE_B: u64 = 25;
pub const XP_CURVE_C: u64 = 10;
pub const MAX_PLAYER_LEVEL: u32 = 100;
/// Requirement reported at the level cap. No amount of XP reaches it.
pub const XP_UNREACHABLE: u64 = u64::MAX;
pub const PASSIVE_POINTS_PER_LEVEL: u32 = 1;
pub const WORLD_LEVELS_PER_PLAYER_LEVEL: i64 = 1;

// World scaling
pub const BASE_WORLD_LEVEL: u32 = 1;
pub const MAX_WORLD_LEVEL: u32 = 100;
pub const MIN_WORLD_VARIANCE: f64 = -2.0;
pub const MAX_WORLD_VARIANCE: f64 = 2.0;
pub const DEFAULT_SCALING_FACTOR: f64 = 0.05;
pub const WORLD_HEALTH_SCALING: f64 = 0.15;
pub const WORLD_DAMAGE_SCALING: f64 = 0.14;
pub const WORLD_LOOT_SCALING: f64 = 0.01;
pub const DEFAULT_VARIANCE_ROLL_MIN: f64 = -1.0;
pub const DEFAULT_VARIANCE_ROLL_MAX: f64 = 1.0;

// Enemy level roll and per-level scaling
pub const ENEMY_LEVEL_NEAR_CHANCE: f64 = 0.6;
pub const ENEMY_LEVEL_NEAR_SPREAD: i64 = 3;
pub const ENEMY_LEVEL_FAR_MIN_OFFSET: i64 = 5;
pub const ENEMY_LEVEL_FAR_MAX_OFFSET: i64 = 10;
pub const ENEMY_HEALTH_PER_LEVEL_DIFF: f64 = 0.05;
pub const ENEMY_DAMAGE_PER_LEVEL_DIFF: f64 = 0.04;
pub const ENEMY_DEFENSE_PER_LEVEL_DIFF: f64 = 0.02;
/// Enemies at or below this max life are treated as critters.
pub const TRIVIAL_ENEMY_MAX_LIFE: i32 = 5;

// Rarity stat application
pub const RARITY_DEFENSE_RATE: f64 = 0.5;
pub const BOSS_MIN_MODIFIERS: usize = 2;
pub const BOSS_MAX_MODIFIERS: usize = 5;
pub const DISPLAY_NAME_MAX_PREFIXES: usize = 2;

// Modifier catalog numbers
pub const SWIFT_VELOCITY_MULT: f32 = 1.3;
pub const TOUGH_DEFENSE_MULT: f64 = 1.5;
pub const TOUGH_KNOCKBACK_RESIST_MULT: f32 = 0.5;
pub const REGENERATING_LIFE_REGEN: i32 = 2;
pub const JUGGERNAUT_LIFE_MULT: i32 = 2;
pub const BRUTAL_DAMAGE_MULT: f64 = 1.4;
pub const EXPLOSIVE_RADIUS: f32 = 150.0;
pub const EXPLOSIVE_DAMAGE_DIVISOR: i32 = 2;
pub const VILE_SPIT_INTERVAL_TICKS: u32 = 180;
pub const VILE_SPIT_RANGE: f32 = 800.0;
pub const VILE_SPIT_SPEED: f32 = 8.0;
pub const VILE_SPIT_DAMAGE_DIVISOR: i32 = 3;
pub const LEECH_HEAL_DIVISOR: i32 = 10;
/// Range used to decide which biome an enemy spawned in.
pub const BIOME_CHECK_RANGE: f32 = 1000.0;

// XP rewards
pub const BASE_KILL_XP: f64 = 10.0;
pub const KILL_XP_PER_LEVEL: f64 = 1.0;
pub const BOSS_XP_MULTIPLIER: f64 = 10.0;
pub const LEGACY_RARITY_XP_STEP: f64 = 0.5;
pub const XP_AWARD_RADIUS: f32 = 1000.0;

// Stat ledger
pub const VITALITY_LIFE_PER_POINT: f64 = 5.0;
pub const MAX_ENDURANCE: f64 = 1.0;

// Persistence
pub const SAVE_VERSION_MAGIC: u64 = 0x4153_4345_4E44_0001;

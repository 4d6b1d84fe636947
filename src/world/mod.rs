//! World scaling: one world level plus a variance offset per loaded world.
//!
//! Player level-ups push the world level up; enemy health, damage and loot
//! quality scale off the effective level.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;

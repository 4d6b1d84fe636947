//! Player level and XP state machine.
//!
//! Levels run 1..=100. XP only ever moves a player up; each level gained
//! awards a passive point and raises the world level.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;

//! Stat ledger: flat and percent bonuses re-derived onto a player's live
//! stat block every tick.

pub mod ledger;
pub mod types;

pub use ledger::*;
pub use types::*;

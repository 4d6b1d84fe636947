//! XP paid out when an enemy dies.
//!
//! Every active, living player close enough to the enemy at death gets the
//! full reward. Nothing checks who actually dealt damage.

pub mod logic;

pub use logic::*;

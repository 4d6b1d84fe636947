//! Progression balance simulator for Monte Carlo analysis.
//!
//! Run many simulated playthroughs to analyze:
//! - Kills needed per level and how fast world level climbs
//! - Rarity tier distribution against the configured spawn chances
//! - Modifier frequencies across the spawn pool
//!
//! Runs go through `ProgressionEngine` hooks so results match what a host
//! game would observe.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::run_simulation;

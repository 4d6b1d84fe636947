//! Ascend - Character and encounter progression engine
//!
//! A host game drives the engine through the hooks on
//! [`engine::ProgressionEngine`]; every feature below is also usable on its
//! own for testing and tooling.

pub mod build_info;
pub mod core;
pub mod enemy;
pub mod engine;
pub mod leveling;
pub mod passives;
pub mod persistence;
pub mod rewards;
pub mod simulator;
pub mod stats;
pub mod world;

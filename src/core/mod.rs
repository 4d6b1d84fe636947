//! Shared constants, progression math, configuration and error types.

pub mod config;
pub mod constants;
pub mod error;
pub mod progression;

pub use config::EngineConfig;
pub use constants::*;
pub use error::{ConfigError, TreeError};
pub use progression::*;

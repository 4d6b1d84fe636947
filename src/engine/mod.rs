//! Engine facade: the lifecycle hooks a host game calls and the per-player
//! bundle they operate on.

pub mod events;
pub mod hooks;
pub mod player;

pub use events::EngineEvent;
pub use hooks::{ProgressionEngine, WorldSession};
pub use player::PlayerCharacter;

//! Passive skill trees: immutable tree definitions, the point economy, and
//! per-player allocations that feed the stat ledger.
//!
//! A node can be raised one tier at a time once all of its prerequisites
//! hold at least one tier. Every tier costs the node's `points_per_tier`.

pub mod allocation;
pub mod class;
pub mod points;
pub mod registry;
pub mod types;

pub use allocation::PassiveAllocations;
pub use class::{ClassSelection, PlayerClass};
pub use points::PassivePointBalance;
pub use registry::{TreeRegistry, TreeSource};
pub use types::*;

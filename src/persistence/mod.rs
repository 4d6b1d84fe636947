//! Key/value persistence used by every progression feature.
//!
//! Features never touch the store with ad-hoc strings; each owns a typed
//! struct with a `load_from` / `save_to` pair that maps fields to named keys.
//! Snapshots of a store can be written to disk as checksummed save files.

pub mod json;
pub mod save_file;
pub mod store;

pub use json::{load_json_or_default, save_json};
pub use save_file::SaveFile;
pub use store::{KvStore, MemoryStore, StoredValue};

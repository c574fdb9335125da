//! Persistence for the Sunset day-cycle engine.
//!
//! Saved state lives in a flat key-value store: integers for the day,
//! phase, flags, and enum codes, floats for settings, and comma-delimited
//! strings for room and puzzle lists. This crate owns the key layout and the
//! lenient decoder; it knows nothing about game rules.
//!
//! # Architecture
//!
//! ```text
//! Game
//!   |
//!   +-- snapshot() --> SaveSlot::save --> KeyValueStore::write_batch
//!   |                                       |-- MemoryStore (tests, demos)
//!   |                                       +-- FileStore   (JSON on disk)
//!   +-- restore()  <-- SaveSlot::load <-- KeyValueStore::get_*
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`KeyValueStore`] trait and [`MemoryStore`]
//! - [`file_store`] -- Atomic JSON file store
//! - [`keys`] -- Persisted key names
//! - [`codec`] -- [`SaveSlot`]: snapshot encoding and lenient decoding
//! - [`error`] -- Shared error types

pub mod codec;
pub mod error;
pub mod file_store;
pub mod keys;
pub mod store;

// Re-export primary types for convenience.
pub use codec::SaveSlot;
pub use error::DbError;
pub use file_store::FileStore;
pub use keys::KeySchema;
pub use store::{KeyValueStore, MemoryStore, StoreValue};

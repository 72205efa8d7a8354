//! Profile persistence: key-value seam and the profile store.
//!
//! # Responsibility
//! - Define the platform key-value storage contract and its SQLite
//!   implementation.
//! - Own the durable profile list and its legacy-format migration.
//!
//! # Invariants
//! - Only the store writes the profile storage keys.
//! - Write paths re-check profile constraints before persisting.

pub mod kv;
pub mod profile_store;

pub use kv::{KeyValueStore, KvError, KvResult, SqliteKeyValueStore};
pub use profile_store::{
    ProfileStore, StoreError, StoreResult, CHILDREN_LIST_KEY, LEGACY_PROFILE_KEY,
};

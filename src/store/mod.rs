//! Store Module
//!
//! The key-value store contract the cache and recorder are built on, plus an
//! in-process implementation of it.

mod entry;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::StoreEntry;
pub use memory::MemoryStore;

/// Shared handle to a store, injected into every component that talks to it.
pub type SharedStore = Arc<dyn KeyValueStore>;

// == Key Value Store ==
/// Byte-oriented key-value store with counters and ordered lists.
///
/// Every method is a single atomic operation. Nothing here spans more than one
/// call, so callers composing several operations get no transaction.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Upserts `value` under `key`, without expiry.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Point read. `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Atomically increments the integer at `key`, starting from 0 if absent.
    ///
    /// Returns the value after the increment.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends `value` to the tail of the list at `key`, creating it if absent.
    ///
    /// Returns the list length after the append.
    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// Reads `start..=stop` of the list at `key`.
    ///
    /// Negative indices count from the tail, so `(0, -1)` is the full list.
    /// An absent key reads as an empty list.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// Removes every key in the keyspace.
    async fn flushdb(&self) -> Result<()>;
}

//! Memory Store Module
//!
//! In-process keyspace implementing the store contract with Redis semantics.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::{KeyValueStore, StoreEntry};

// == Memory Store ==
/// HashMap-backed keyspace guarded by a single async RwLock.
///
/// Each trait method takes the lock once, which is what makes every operation
/// atomic. Entries never expire.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Keyspace
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of keys currently in the keyspace.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the keyspace holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoreEntry::Bytes(value));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(StoreEntry::Bytes(bytes)) => Ok(Some(bytes.clone())),
            Some(other) => Err(CacheError::WrongType(format!(
                "GET on '{}' which holds a {}",
                key,
                other.kind()
            ))),
            None => Ok(None),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;

        let current = match entries.get(key) {
            Some(entry) => entry.as_integer(key)?,
            None => 0,
        };
        let next = current.checked_add(1).ok_or_else(|| {
            CacheError::WrongType(format!("increment on '{}' would overflow", key))
        })?;

        entries.insert(key.to_string(), StoreEntry::Bytes(next.to_string().into_bytes()));
        Ok(next)
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        let mut entries = self.entries.write().await;

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| StoreEntry::List(Vec::new()));

        match entry {
            StoreEntry::List(items) => {
                items.push(value);
                Ok(items.len())
            }
            other => Err(CacheError::WrongType(format!(
                "RPUSH on '{}' which holds a {}",
                key,
                other.kind()
            ))),
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(StoreEntry::List(items)) => Ok(StoreEntry::range(items, start, stop)),
            Some(other) => Err(CacheError::WrongType(format!(
                "LRANGE on '{}' which holds a {}",
                key,
                other.kind()
            ))),
            None => Ok(Vec::new()),
        }
    }

    async fn flushdb(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        debug!("FLUSHDB removed {} keys", removed);
        Ok(())
    }
}

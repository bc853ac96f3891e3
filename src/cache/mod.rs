//! Cache Module
//!
//! Facade storing scalar values under random keys, with every `store` call
//! counted and logged by an [`InvocationRecorder`].

pub mod codec;


use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;
use crate::recorder::{replay, CallTrace, InvocationRecorder, MethodId};
use crate::store::SharedStore;

// Re-export public types
pub use codec::Value;

// == Cache ==
/// Scalar cache over a shared key-value store.
///
/// Construction flushes the whole keyspace. The flush is global to the store,
/// so two caches built on the same store at the same time will wipe each
/// other's data; use one cache per store session.
#[derive(Clone)]
pub struct Cache {
    /// Shared store handle
    store: SharedStore,
    /// Recorder bound to `Cache.store`
    store_recorder: InvocationRecorder,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache with the default configuration, flushing the store.
    pub async fn new(store: SharedStore) -> Result<Self> {
        Self::with_config(store, &Config::default()).await
    }

    /// Creates a cache using `config` for its recorder, flushing the store.
    pub async fn with_config(store: SharedStore, config: &Config) -> Result<Self> {
        store.flushdb().await?;
        info!("Keyspace flushed, starting a fresh cache session");

        let store_recorder =
            InvocationRecorder::from_config(store.clone(), MethodId::CACHE_STORE, config);

        Ok(Self {
            store,
            store_recorder,
        })
    }

    // == Store ==
    /// Stores `value` under a fresh random key and returns the key.
    ///
    /// Recorded as `Cache.store`.
    pub async fn store(&self, value: impl Into<Value>) -> Result<String> {
        self.store_recorder
            .record((value.into(),), |(value,)| self.write_value(value))
            .await
    }

    async fn write_value(&self, value: Value) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, value.encode()).await?;
        debug!(key = %key, "Stored value");
        Ok(key)
    }

    // == Get ==
    /// Reads the raw bytes under `key`. `Ok(None)` when the key is absent.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Reads `key` and decodes it with `decoder`.
    ///
    /// The decoder only runs when the key exists.
    pub async fn get_as<T, D>(&self, key: &str, decoder: D) -> Result<Option<T>>
    where
        D: FnOnce(&[u8]) -> Result<T>,
    {
        match self.store.get(key).await? {
            Some(bytes) => decoder(&bytes).map(Some),
            None => Ok(None),
        }
    }

    // == Decoders ==
    /// Decoder for values stored as text.
    pub fn get_str(bytes: &[u8]) -> Result<String> {
        codec::decode_text(bytes)
    }

    /// Decoder for values stored as integers.
    pub fn get_int(bytes: &[u8]) -> Result<i64> {
        codec::decode_int(bytes)
    }

    /// Decoder for values stored as floats.
    pub fn get_float(bytes: &[u8]) -> Result<f64> {
        codec::decode_float(bytes)
    }

    // == Replay ==
    /// Call trace of an instrumented method on this cache's store.
    pub async fn replay(&self, method: MethodId) -> Result<CallTrace> {
        replay(self.store.as_ref(), method).await
    }
}

//! Integration Tests for the Recorded Cache
//!
//! Exercises the public API end to end: storing, retrieval, recording and
//! replay, including a store that fails on demand.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use recorded_cache::{
    replay, Cache, CacheError, Config, FailurePolicy, InvocationRecorder, KeyValueStore,
    MemoryStore, MethodId, Result, SharedStore,
};

// == Helper Types ==

/// Wraps a memory store and fails `set` on the configured call number.
struct FlakyStore {
    inner: MemoryStore,
    sets: AtomicUsize,
    fail_set_on: usize,
    offline: AtomicBool,
}

impl FlakyStore {
    fn failing_set_on(call: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            sets: AtomicUsize::new(0),
            fail_set_on: call,
            offline: AtomicBool::new(false),
        }
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(CacheError::StoreUnavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.check_online()?;
        let call = self.sets.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_set_on {
            return Err(CacheError::StoreUnavailable("connection reset".to_string()));
        }
        self.inner.set(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_online()?;
        self.inner.get(key).await
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.check_online()?;
        self.inner.incr(key).await
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        self.check_online()?;
        self.inner.rpush(key, value).await
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        self.check_online()?;
        self.inner.lrange(key, start, stop).await
    }

    async fn flushdb(&self) -> Result<()> {
        self.check_online()?;
        self.inner.flushdb().await
    }
}

// == Helper Functions ==

fn memory_store() -> SharedStore {
    Arc::new(MemoryStore::new())
}

async fn log_len(store: &SharedStore, key: &str) -> usize {
    store.lrange(key, 0, -1).await.unwrap().len()
}

// == Retrieval Scenarios ==

#[tokio::test]
async fn test_store_text_then_get_raw_and_decoded() {
    let cache = Cache::new(memory_store()).await.unwrap();

    let key = cache.store("abc").await.unwrap();

    assert_eq!(cache.get(&key).await.unwrap(), Some(b"abc".to_vec()));
    assert_eq!(
        cache.get_as(&key, Cache::get_str).await.unwrap(),
        Some("abc".to_string())
    );
}

#[tokio::test]
async fn test_store_int_then_get_int() {
    let cache = Cache::new(memory_store()).await.unwrap();

    let key = cache.store(42).await.unwrap();

    assert_eq!(cache.get_as(&key, Cache::get_int).await.unwrap(), Some(42));
}

#[tokio::test]
async fn test_get_nonexistent_key_is_none() {
    let cache = Cache::new(memory_store()).await.unwrap();

    assert_eq!(cache.get("nonexistent-key").await.unwrap(), None);
}

#[tokio::test]
async fn test_keys_are_unique() {
    let cache = Cache::new(memory_store()).await.unwrap();

    let first = cache.store("same").await.unwrap();
    let second = cache.store("same").await.unwrap();

    assert_ne!(first, second);
}

// == Recording and Replay ==

#[tokio::test]
async fn test_sequential_stores_keep_logs_and_counter_equal() {
    let store = memory_store();
    let cache = Cache::new(store.clone()).await.unwrap();
    let method = MethodId::CACHE_STORE;

    let values = ["first", "second", "third", "fourth", "fifth"];
    let mut keys = Vec::new();
    for value in values {
        keys.push(cache.store(value).await.unwrap());
    }

    assert_eq!(store.get(method.counter_key()).await.unwrap(), Some(b"5".to_vec()));
    assert_eq!(log_len(&store, &method.inputs_key()).await, 5);
    assert_eq!(log_len(&store, &method.outputs_key()).await, 5);
    for (key, value) in keys.iter().zip(values) {
        assert_eq!(
            cache.get_as(key, Cache::get_str).await.unwrap().as_deref(),
            Some(value)
        );
    }
}

#[tokio::test]
async fn test_replay_prints_calls_in_order() {
    let cache = Cache::new(memory_store()).await.unwrap();

    let k1 = cache.store("foo").await.unwrap();
    let k2 = cache.store("bar").await.unwrap();
    let k3 = cache.store(42).await.unwrap();

    let trace = cache.replay(MethodId::CACHE_STORE).await.unwrap();
    let expected = format!(
        "Cache.store was called 3 times:\n\
         Cache.store(*(\"foo\",)) -> \"{}\"\n\
         Cache.store(*(\"bar\",)) -> \"{}\"\n\
         Cache.store(*(42,)) -> \"{}\"\n",
        k1, k2, k3
    );
    assert_eq!(trace.to_string(), expected);
}

#[tokio::test]
async fn test_cache_replay_matches_free_replay() {
    let store = memory_store();
    let cache = Cache::new(store.clone()).await.unwrap();
    cache.store(1.5).await.unwrap();

    let via_cache = cache.replay(MethodId::CACHE_STORE).await.unwrap();
    let via_store = replay(store.as_ref(), MethodId::CACHE_STORE).await.unwrap();

    assert_eq!(via_cache, via_store);
    assert_eq!(via_cache.entries[0].args, "(1.5,)");
}

#[tokio::test]
async fn test_second_construction_resets_everything() {
    let store = memory_store();
    let method = MethodId::CACHE_STORE;

    let first = Cache::new(store.clone()).await.unwrap();
    first.store("a").await.unwrap();
    first.store("b").await.unwrap();

    let _second = Cache::new(store.clone()).await.unwrap();

    assert_eq!(store.get(method.counter_key()).await.unwrap(), None);
    assert_eq!(log_len(&store, &method.inputs_key()).await, 0);
    assert_eq!(log_len(&store, &method.outputs_key()).await, 0);
}

// == Failure Handling ==

#[tokio::test]
async fn test_failed_store_leaves_partial_recording() {
    let store: SharedStore = Arc::new(FlakyStore::failing_set_on(2));
    let cache = Cache::new(store.clone()).await.unwrap();
    let method = MethodId::CACHE_STORE;

    let key = cache.store("ok").await.unwrap();
    let err = cache.store("lost").await.unwrap_err();
    assert!(matches!(err, CacheError::StoreUnavailable(_)));

    assert_eq!(store.get(method.counter_key()).await.unwrap(), Some(b"2".to_vec()));
    assert_eq!(log_len(&store, &method.inputs_key()).await, 2);
    assert_eq!(log_len(&store, &method.outputs_key()).await, 1);

    let trace = cache.replay(method).await.unwrap();
    assert_eq!(trace.calls, 2);
    assert_eq!(trace.entries.len(), 1);
    assert_eq!(
        trace.to_string(),
        format!(
            "Cache.store was called 2 times:\nCache.store(*(\"ok\",)) -> \"{}\"\n",
            key
        )
    );
}

#[tokio::test]
async fn test_record_error_policy_through_cache() {
    let store: SharedStore = Arc::new(FlakyStore::failing_set_on(1));
    let config = Config {
        failure_policy: FailurePolicy::RecordError,
        ..Config::default()
    };
    let cache = Cache::with_config(store.clone(), &config).await.unwrap();

    assert!(cache.store("lost").await.is_err());

    let trace = cache.replay(MethodId::CACHE_STORE).await.unwrap();
    assert_eq!(trace.calls, 1);
    assert!(trace.is_complete());
    assert_eq!(
        trace.entries[0].output,
        r#"error("Store unavailable: connection reset")"#
    );
}

#[tokio::test]
async fn test_unavailable_store_propagates() {
    let flaky = Arc::new(FlakyStore::failing_set_on(0));
    let store: SharedStore = flaky.clone();
    let cache = Cache::new(store).await.unwrap();

    flaky.offline.store(true, Ordering::SeqCst);

    assert!(matches!(
        cache.get("any").await,
        Err(CacheError::StoreUnavailable(_))
    ));
    assert!(matches!(
        cache.store("x").await,
        Err(CacheError::StoreUnavailable(_))
    ));
    assert!(matches!(
        cache.replay(MethodId::CACHE_STORE).await,
        Err(CacheError::StoreUnavailable(_))
    ));
}

// == Instrumenting Other Operations ==

const SQUARE: MethodId = MethodId::new("Calculator.square");

#[tokio::test]
async fn test_wrapped_operation_replays_with_its_own_identity() {
    let store = memory_store();
    let square = InvocationRecorder::new(store.clone(), SQUARE)
        .wrap(|(n,): (i64,)| async move { Ok::<_, CacheError>(n * n) });

    for n in [2, 3, 4] {
        square.call((n,)).await.unwrap();
    }

    let trace = replay(store.as_ref(), SQUARE).await.unwrap();
    assert_eq!(
        trace.to_string(),
        "Calculator.square was called 3 times:\n\
         Calculator.square(*(2,)) -> 4\n\
         Calculator.square(*(3,)) -> 9\n\
         Calculator.square(*(4,)) -> 16\n"
    );

    // Recording one method leaves others untouched
    let other = replay(store.as_ref(), MethodId::CACHE_STORE).await.unwrap();
    assert_eq!(other.calls, 0);
}

#[tokio::test]
async fn test_concurrent_serialized_stores_stay_aligned() {
    let store = memory_store();
    let config = Config {
        serialize_calls: true,
        ..Config::default()
    };
    let cache = Cache::with_config(store.clone(), &config).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16i64 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let key = cache.store(i).await.unwrap();
            (i, key)
        }));
    }
    let mut stored = Vec::new();
    for handle in handles {
        stored.push(handle.await.unwrap());
    }

    let trace = cache.replay(MethodId::CACHE_STORE).await.unwrap();
    assert_eq!(trace.calls, 16);
    assert!(trace.is_complete());
    for (i, key) in stored {
        let entry = trace
            .entries
            .iter()
            .find(|entry| entry.args == format!("({},)", i))
            .unwrap();
        assert_eq!(entry.output, format!("\"{}\"", key));
    }
}

#[tokio::test]
async fn test_separately_built_serialized_caches_stay_aligned() {
    let store = memory_store();
    let config = Config {
        serialize_calls: true,
        ..Config::default()
    };
    let first = Cache::with_config(store.clone(), &config).await.unwrap();
    let second = Cache::with_config(store.clone(), &config).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16i64 {
        let cache = if i % 2 == 0 { first.clone() } else { second.clone() };
        handles.push(tokio::spawn(async move {
            let key = cache.store(i).await.unwrap();
            (i, key)
        }));
    }
    let mut stored = Vec::new();
    for handle in handles {
        stored.push(handle.await.unwrap());
    }

    let trace = first.replay(MethodId::CACHE_STORE).await.unwrap();
    assert_eq!(trace.calls, 16);
    assert!(trace.is_complete());
    for (i, key) in stored {
        let entry = trace
            .entries
            .iter()
            .find(|entry| entry.args == format!("({},)", i))
            .unwrap();
        assert_eq!(entry.output, format!("\"{}\"", key));
    }
}

//! Recorded Cache demo
//!
//! Stores a few sample values in an in-process store, reads them back and
//! prints the replay of `Cache.store`.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recorded_cache::{Cache, Config, MemoryStore, MethodId, SharedStore, Value};

/// Entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache over a fresh memory store
/// 4. Store sample values of every kind and read them back
/// 5. Print the replay of `Cache.store`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recorded_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: serialize_calls={}, failure_policy={:?}, demo_values={}",
        config.serialize_calls, config.failure_policy, config.demo_values
    );

    let store: SharedStore = Arc::new(MemoryStore::new());
    let cache = Cache::with_config(store, &config)
        .await
        .context("failed to start cache session")?;

    for i in 0..config.demo_values {
        let value = sample_value(i);
        let key = cache.store(value.clone()).await?;
        let read_back = match value {
            Value::Text(_) => format!("{:?}", cache.get_as(&key, Cache::get_str).await?),
            Value::Int(_) => format!("{:?}", cache.get_as(&key, Cache::get_int).await?),
            Value::Float(_) => format!("{:?}", cache.get_as(&key, Cache::get_float).await?),
            Value::Bytes(_) => format!("{:?}", cache.get(&key).await?),
        };
        info!("{} -> {}", key, read_back);
    }

    let trace = cache.replay(MethodId::CACHE_STORE).await?;
    let mut stdout = io::stdout().lock();
    trace.write_to(&mut stdout)?;
    stdout.flush()?;

    Ok(())
}

fn sample_value(i: usize) -> Value {
    match i % 4 {
        0 => Value::Text(format!("sample-{}", i)),
        1 => Value::Int(i as i64 * 10),
        2 => Value::Float(i as f64 / 4.0),
        _ => Value::Bytes(vec![b'b', i as u8]),
    }
}

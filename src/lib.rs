//! Recorded Cache - a scalar cache over a key-value store
//!
//! Counts and logs every `store` call in the store itself, and replays the
//! logged calls as a readable trace.

pub mod cache;
pub mod config;
pub mod error;
pub mod recorder;
pub mod store;

pub use cache::{Cache, Value};
pub use config::Config;
pub use error::{CacheError, Result};
pub use recorder::{replay, CallTrace, FailurePolicy, Instrumented, InvocationRecorder, MethodId};
pub use store::{KeyValueStore, MemoryStore, SharedStore};

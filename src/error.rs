//! Error types for the recorded cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache, the recorder and the store backends.
///
/// A missing key is not an error: point reads return `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Transport or connection failure talking to the store
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Stored bytes could not be decoded as the requested scalar kind
    #[error("Cannot decode {kind}: {reason}")]
    Decode {
        /// Requested scalar kind
        kind: &'static str,
        /// What was wrong with the bytes
        reason: String,
    },

    /// Operation applied to a key holding the wrong kind of value
    #[error("Wrong type: {0}")]
    WrongType(String),

    /// Failure raised by an instrumented operation
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Shorthand for a decode failure of the given kind.
    pub fn decode(kind: &'static str, reason: impl Into<String>) -> Self {
        CacheError::Decode {
            kind,
            reason: reason.into(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

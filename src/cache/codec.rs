//! Scalar Codec Module
//!
//! Converts the supported value kinds to and from the store's byte form.
//!
//! Integers and floats are written as ASCII decimal text, the representation
//! a Redis server uses natively, so reading them back never depends on the
//! platform byte order.

use crate::error::{CacheError, Result};

// == Value ==
/// A scalar that can be stored in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text
    Text(String),
    /// Raw bytes, stored unchanged
    Bytes(Vec<u8>),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
}

impl Value {
    // == Encode ==
    /// Returns the byte representation written to the store.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Value::Text(text) => text.as_bytes().to_vec(),
            Value::Bytes(bytes) => bytes.clone(),
            Value::Int(n) => n.to_string().into_bytes(),
            Value::Float(x) => format!("{:?}", x).into_bytes(),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

// == Decoders ==
/// Returns the bytes unchanged.
pub fn decode_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    Ok(bytes.to_vec())
}

/// Decodes strict UTF-8 text.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| CacheError::decode("text", e.to_string()))
}

/// Decodes an integer written by [`Value::encode`] (ASCII decimal).
pub fn decode_int(bytes: &[u8]) -> Result<i64> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| CacheError::decode("integer", e.to_string()))?;
    text.parse::<i64>()
        .map_err(|e| CacheError::decode("integer", format!("{:?}: {}", text, e)))
}

/// Decodes a floating point number written by [`Value::encode`].
pub fn decode_float(bytes: &[u8]) -> Result<f64> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| CacheError::decode("float", e.to_string()))?;
    text.parse::<f64>()
        .map_err(|e| CacheError::decode("float", format!("{:?}: {}", text, e)))
}

/// Decodes a packed 8-byte big-endian integer.
///
/// For callers storing binary integers as [`Value::Bytes`]; the cache itself
/// never writes this form.
pub fn decode_int_be(bytes: &[u8]) -> Result<i64> {
    let packed: [u8; 8] = bytes.try_into().map_err(|_| {
        CacheError::decode(
            "big-endian integer",
            format!("expected 8 bytes, got {}", bytes.len()),
        )
    })?;
    Ok(i64::from_be_bytes(packed))
}

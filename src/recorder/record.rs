//! Call Record Encoding
//!
//! Text form of the arguments and results the recorder appends to its logs.
//!
//! # Format
//! - text: double-quoted with JSON escapes, `"abc"`
//! - bytes: `b"..."` with ASCII escapes
//! - integers and booleans: as written in Rust, `42`, `true`
//! - floats: shortest round-trip form with a decimal point, `3.0`
//! - unit and `None`: `None`
//! - argument tuples: `()`, `(a,)`, `(a, b)`
//! - failures: `error("message")`

use crate::cache::Value;
use crate::error::CacheError;

// == Call Record ==
/// A single argument or result as it appears in a log entry.
pub trait CallRecord {
    /// Encodes the value for a log entry.
    fn to_record(&self) -> String;
}

fn quoted(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

fn byte_literal(bytes: &[u8]) -> String {
    format!("b\"{}\"", bytes.escape_ascii())
}

impl CallRecord for str {
    fn to_record(&self) -> String {
        quoted(self)
    }
}

impl CallRecord for String {
    fn to_record(&self) -> String {
        quoted(self)
    }
}

impl CallRecord for [u8] {
    fn to_record(&self) -> String {
        byte_literal(self)
    }
}

impl CallRecord for Vec<u8> {
    fn to_record(&self) -> String {
        byte_literal(self)
    }
}

impl CallRecord for i64 {
    fn to_record(&self) -> String {
        self.to_string()
    }
}

impl CallRecord for bool {
    fn to_record(&self) -> String {
        self.to_string()
    }
}

impl CallRecord for f64 {
    fn to_record(&self) -> String {
        format!("{:?}", self)
    }
}

impl CallRecord for () {
    fn to_record(&self) -> String {
        "None".to_string()
    }
}

impl<T: CallRecord> CallRecord for Option<T> {
    fn to_record(&self) -> String {
        match self {
            Some(inner) => inner.to_record(),
            None => "None".to_string(),
        }
    }
}

impl<T: CallRecord + ?Sized> CallRecord for &T {
    fn to_record(&self) -> String {
        (**self).to_record()
    }
}

impl CallRecord for Value {
    fn to_record(&self) -> String {
        match self {
            Value::Text(text) => text.to_record(),
            Value::Bytes(bytes) => bytes.to_record(),
            Value::Int(n) => n.to_record(),
            Value::Float(x) => x.to_record(),
        }
    }
}

impl CallRecord for CacheError {
    fn to_record(&self) -> String {
        format!("error({})", quoted(&self.to_string()))
    }
}

// == Call Args ==
/// A positional argument tuple.
pub trait CallArgs {
    /// Encodes the whole tuple for an input log entry.
    fn to_args_record(&self) -> String;
}

impl CallArgs for () {
    fn to_args_record(&self) -> String {
        "()".to_string()
    }
}

impl<A: CallRecord> CallArgs for (A,) {
    fn to_args_record(&self) -> String {
        format!("({},)", self.0.to_record())
    }
}

impl<A: CallRecord, B: CallRecord> CallArgs for (A, B) {
    fn to_args_record(&self) -> String {
        format!("({}, {})", self.0.to_record(), self.1.to_record())
    }
}

impl<A: CallRecord, B: CallRecord, C: CallRecord> CallArgs for (A, B, C) {
    fn to_args_record(&self) -> String {
        format!(
            "({}, {}, {})",
            self.0.to_record(),
            self.1.to_record(),
            self.2.to_record()
        )
    }
}

//! Call Trace Module
//!
//! Rebuilds a readable call trace from a method's counter and logs.

use std::fmt;
use std::io;

use serde::Serialize;

use crate::cache::codec::decode_int;
use crate::error::{CacheError, Result};
use crate::recorder::MethodId;
use crate::store::KeyValueStore;

// == Trace Entry ==
/// One recorded call: the argument tuple and the result, as logged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    /// Encoded argument tuple
    pub args: String,
    /// Encoded result
    pub output: String,
}

// == Call Trace ==
/// Call history of one method, in call order.
///
/// `calls` is the counter value; `entries` only holds the positions present
/// in both logs, so it can be shorter after failed calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallTrace {
    /// Method identity
    pub method: String,
    /// Invocation counter value
    pub calls: i64,
    /// Paired log entries, oldest first
    pub entries: Vec<TraceEntry>,
}

impl CallTrace {
    /// True when every counted call has a paired input and output.
    pub fn is_complete(&self) -> bool {
        self.entries.len() as i64 == self.calls
    }

    /// Writes the rendered trace to `out`.
    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)
    }

    /// Serializes the trace as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CacheError::Internal(e.to_string()))
    }
}

impl fmt::Display for CallTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.method, self.calls)?;
        for entry in &self.entries {
            writeln!(f, "{}(*{}) -> {}", self.method, entry.args, entry.output)?;
        }
        Ok(())
    }
}

// == Replay ==
/// Reads the counter and both logs of `method` and pairs them by position.
///
/// Read-only. A missing counter reads as zero calls. Log entries are decoded
/// as lossy UTF-8.
pub async fn replay(store: &dyn KeyValueStore, method: MethodId) -> Result<CallTrace> {
    let calls = match store.get(method.counter_key()).await? {
        Some(bytes) => decode_int(&bytes)?,
        None => 0,
    };
    let inputs = store.lrange(&method.inputs_key(), 0, -1).await?;
    let outputs = store.lrange(&method.outputs_key(), 0, -1).await?;

    let entries = inputs
        .iter()
        .zip(outputs.iter())
        .map(|(args, output)| TraceEntry {
            args: String::from_utf8_lossy(args).into_owned(),
            output: String::from_utf8_lossy(output).into_owned(),
        })
        .collect();

    Ok(CallTrace {
        method: method.to_string(),
        calls,
        entries,
    })
}

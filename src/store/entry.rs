//! Store Entry Module
//!
//! Defines the value shapes a key can hold in the in-process store.

use crate::error::{CacheError, Result};

// == Store Entry ==
/// A single keyspace entry: either a plain byte string or an ordered list.
///
/// Counters are plain byte strings holding an ASCII decimal integer, the same
/// way a Redis server keeps them.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEntry {
    /// Scalar byte string
    Bytes(Vec<u8>),
    /// Ordered list of byte strings, oldest first
    List(Vec<Vec<u8>>),
}

impl StoreEntry {
    // == Kind ==
    /// Short name of the entry kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreEntry::Bytes(_) => "string",
            StoreEntry::List(_) => "list",
        }
    }

    // == As Integer ==
    /// Interprets a byte string entry as a decimal integer.
    ///
    /// # Returns
    /// - `Ok(n)` for a byte string holding a valid `i64`
    /// - `Err(WrongType)` for lists and non-integer byte strings
    pub fn as_integer(&self, key: &str) -> Result<i64> {
        match self {
            StoreEntry::Bytes(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| {
                    CacheError::WrongType(format!("value at '{}' is not an integer", key))
                }),
            StoreEntry::List(_) => Err(CacheError::WrongType(format!(
                "'{}' holds a list, not an integer",
                key
            ))),
        }
    }

    // == Range ==
    /// Returns the inclusive `start..=stop` slice of a list entry.
    ///
    /// Out-of-range indices are clamped; an empty or inverted range yields no
    /// items.
    pub fn range(items: &[Vec<u8>], start: isize, stop: isize) -> Vec<Vec<u8>> {
        let len = items.len() as isize;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

        if start > stop || start >= len {
            return Vec::new();
        }

        items[start as usize..=stop as usize].to_vec()
    }
}

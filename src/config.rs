//! Configuration Module
//!
//! Handles loading recorder and demo settings from environment variables.

use std::env;

use crate::recorder::FailurePolicy;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Hold the method's process-wide lock across the whole record sequence
    pub serialize_calls: bool,
    /// What the recorder writes to the output log when an operation fails
    pub failure_policy: FailurePolicy,
    /// Number of sample values the demo binary stores
    pub demo_values: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SERIALIZE_CALLS` - Serialize recorded calls per method (default: false)
    /// - `CACHE_FAILURE_POLICY` - `skip` or `record` (default: skip)
    /// - `CACHE_DEMO_VALUES` - Sample values stored by the demo (default: 3)
    pub fn from_env() -> Self {
        Self {
            serialize_calls: env::var("CACHE_SERIALIZE_CALLS")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
            failure_policy: env::var("CACHE_FAILURE_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            demo_values: env::var("CACHE_DEMO_VALUES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serialize_calls: false,
            failure_policy: FailurePolicy::SkipOutput,
            demo_values: 3,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

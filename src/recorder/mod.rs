//! Recorder Module
//!
//! Counts invocations of an operation and keeps its argument and result
//! history in the store, without the operation knowing about it.
//!
//! # Store layout per method
//! - `<method>` - invocation counter
//! - `<method>:inputs` - one encoded argument tuple per call
//! - `<method>:outputs` - one encoded result per successful call
//!
//! The three writes of a call are separate store operations. Concurrent calls
//! on one method can interleave between them, so input `i` and output `i` may
//! belong to different calls unless the recorder is serialized. Serialized
//! recorders share one lock per method identity across the process.

mod method;
mod record;
mod trace;

use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, Mutex as StdMutex, OnceLock};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::store::SharedStore;

// Re-export public types
pub use method::MethodId;
pub use record::{CallArgs, CallRecord};
pub use trace::{replay, CallTrace, TraceEntry};

// == Failure Policy ==
/// What the output log receives when the recorded operation fails.
///
/// The counter and the input log are written before the operation runs, so
/// they always count attempted calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Append nothing; the output log falls behind the input log
    #[default]
    SkipOutput,
    /// Append an `error(...)` record so both logs keep the same length
    RecordError,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" | "skip_output" => Ok(FailurePolicy::SkipOutput),
            "record" | "record_error" => Ok(FailurePolicy::RecordError),
            other => Err(format!("unknown failure policy: {}", other)),
        }
    }
}

// == Call Gates ==
/// One lock per method identity, shared by every serialized recorder.
static CALL_GATES: OnceLock<StdMutex<HashMap<MethodId, Arc<Mutex<()>>>>> = OnceLock::new();

fn gate_for(method: MethodId) -> Arc<Mutex<()>> {
    let gates = CALL_GATES.get_or_init(Default::default);
    let mut gates = gates
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    gates.entry(method).or_default().clone()
}

// == Invocation Recorder ==
/// Records calls of one method into the shared store.
#[derive(Clone)]
pub struct InvocationRecorder {
    /// Store holding the counter and logs
    store: SharedStore,
    /// Identity the counter and logs are keyed by
    method: MethodId,
    /// Output log behavior on failed calls
    policy: FailurePolicy,
    /// Lock of `method`, held across a whole call when serialized
    gate: Option<Arc<Mutex<()>>>,
}

impl InvocationRecorder {
    // == Constructor ==
    /// Creates an unserialized recorder with the default failure policy.
    pub fn new(store: SharedStore, method: MethodId) -> Self {
        Self {
            store,
            method,
            policy: FailurePolicy::default(),
            gate: None,
        }
    }

    /// Creates a recorder with the policy and serialization from `config`.
    pub fn from_config(store: SharedStore, method: MethodId, config: &Config) -> Self {
        let recorder = Self::new(store, method).with_policy(config.failure_policy);
        if config.serialize_calls {
            recorder.serialized()
        } else {
            recorder
        }
    }

    /// Sets what the output log receives when a call fails.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs calls one at a time across every serialized recorder of the same
    /// method in this process, so counter and log positions always line up.
    ///
    /// Recorders in other processes sharing the store are not covered.
    pub fn serialized(mut self) -> Self {
        self.gate = Some(gate_for(self.method));
        self
    }

    /// Identity this recorder writes under.
    pub fn method(&self) -> MethodId {
        self.method
    }

    /// Current failure policy.
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// True when calls hold the method's lock.
    pub fn is_serialized(&self) -> bool {
        self.gate.is_some()
    }

    // == Record ==
    /// Runs `op(args)` and records the call.
    ///
    /// The counter is incremented and the arguments appended before `op`
    /// runs. A store failure at that point is returned without running `op`.
    /// The result is returned unchanged; an error from `op` takes precedence
    /// over a failure to record it.
    ///
    /// If `op` succeeds but appending its output fails, the store error is
    /// returned and the result is dropped. Any side effect of `op` (for
    /// `Cache::store`, the value written under its key) is kept even though
    /// the caller never sees the result.
    pub async fn record<A, R, F, Fut>(&self, args: A, op: F) -> Result<R>
    where
        A: CallArgs,
        R: CallRecord,
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let _guard = match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        let calls = self.store.incr(self.method.counter_key()).await?;
        let input = args.to_args_record();
        self.store
            .rpush(&self.method.inputs_key(), input.clone().into_bytes())
            .await?;
        debug!(method = %self.method, call = calls, args = %input, "Recorded call input");

        match op(args).await {
            Ok(result) => {
                let output = result.to_record();
                self.store
                    .rpush(&self.method.outputs_key(), output.clone().into_bytes())
                    .await?;
                debug!(method = %self.method, call = calls, result = %output, "Recorded call output");
                Ok(result)
            }
            Err(err) => {
                warn!(method = %self.method, call = calls, error = %err, "Recorded call failed");
                if self.policy == FailurePolicy::RecordError {
                    if let Err(record_err) = self
                        .store
                        .rpush(&self.method.outputs_key(), err.to_record().into_bytes())
                        .await
                    {
                        warn!(method = %self.method, error = %record_err, "Failed to record call error");
                    }
                }
                Err(err)
            }
        }
    }

    // == Wrap ==
    /// Binds this recorder to `op`, giving an instrumented callable.
    pub fn wrap<F>(self, op: F) -> Instrumented<F> {
        Instrumented { recorder: self, op }
    }
}

// == Instrumented ==
/// An operation whose every call goes through an [`InvocationRecorder`].
pub struct Instrumented<F> {
    /// Recorder every call goes through
    recorder: InvocationRecorder,
    /// Wrapped operation
    op: F,
}

impl<F> Instrumented<F> {
    /// Calls the wrapped operation with `args`, recording the call.
    pub async fn call<A, R, Fut>(&self, args: A) -> Result<R>
    where
        A: CallArgs,
        R: CallRecord,
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        self.recorder.record(args, &self.op).await
    }
}

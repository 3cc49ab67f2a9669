//! Script execution result and its classification.
//!
//! [`ExecutionResult`] is what the subprocess layer hands back;
//! [`ExecutionResult::into_output`] decides whether that counts as success,
//! a script failure, or a timeout, and shapes the success output.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InvocationError;

/// Outcome of one run of the external script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Process exit code (`-1` if killed by signal or timed out).
    pub exit_code: i32,
    /// Complete stdout captured from the process.
    pub stdout: String,
    /// Complete stderr captured from the process.
    pub stderr: String,
    /// The process was killed because it exceeded its bound.
    pub timed_out: bool,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Result for a process killed at the timeout. No output is kept.
    pub fn timed_out(duration_ms: u64) -> Self {
        Self {
            exit_code: -1,
            stdout: String::new(),
            stderr: String::new(),
            timed_out: true,
            duration_ms,
        }
    }

    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == 0
    }

    /// Classify the run and produce the `output` value for a success.
    ///
    /// With `parse_json` set, stdout is parsed as JSON and falls back to the
    /// raw text when it does not parse. `timeout` is only used to describe
    /// the bound in the timeout error.
    pub fn into_output(
        self,
        parse_json: bool,
        timeout: Duration,
    ) -> Result<Value, InvocationError> {
        if self.timed_out {
            return Err(InvocationError::Timeout { timeout });
        }
        if self.exit_code != 0 {
            return Err(InvocationError::ScriptFailure {
                exit_code: self.exit_code,
                stdout: self.stdout,
                stderr: self.stderr,
            });
        }
        if parse_json {
            Ok(parse_or_raw(self.stdout))
        } else {
            Ok(Value::String(self.stdout))
        }
    }
}

/// Parse `text` as JSON, or return it untouched as a string value.
fn parse_or_raw(text: String) -> Value {
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Response envelope returned to the caller.
//!
//! The envelope follows the API-gateway proxy shape: an integer
//! `statusCode` and a `body` holding a JSON document as a string.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::InvocationError;

/// Structured response for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-encoded [`ResponseBody`].
    pub body: String,
}

/// Decoded form of [`ResponseEnvelope::body`].
///
/// `output` is omitted for timeouts and unexpected failures; `error` is
/// `null` on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Exit 0: status 200 with the (possibly parsed) stdout.
    pub fn success(output: Value) -> Self {
        Self::new(
            200,
            json!({
                "success": true,
                "output": output,
                "error": null,
            }),
        )
    }

    fn new(status_code: u16, body: Value) -> Self {
        Self {
            status_code,
            body: body.to_string(),
        }
    }

    /// Decode the body.
    pub fn parse_body(&self) -> serde_json::Result<ResponseBody> {
        serde_json::from_str(&self.body)
    }
}

impl From<InvocationError> for ResponseEnvelope {
    fn from(err: InvocationError) -> Self {
        let status_code = err.status_code();
        match err {
            // Partial stdout is kept alongside stderr.
            InvocationError::ScriptFailure { stdout, stderr, .. } => Self::new(
                status_code,
                json!({
                    "success": false,
                    "output": stdout,
                    "error": stderr,
                }),
            ),
            other => Self::new(
                status_code,
                json!({
                    "success": false,
                    "error": other.to_string(),
                }),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

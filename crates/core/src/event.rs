//! Invocation event model.
//!
//! The event is a loose JSON object; only three keys are read and each has
//! a default. Values are passed through to the script without validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InvocationError;

pub const DEFAULT_ACTION: &str = "deploy";
pub const DEFAULT_TARGET: &str = "both";
pub const DEFAULT_IMAGE_TAG: &str = "latest";

/// Action whose stdout is expected to be a JSON document.
pub const STATUS_ACTION: &str = "status";

/// One request to the handler.
///
/// Unknown keys are ignored and an absent key takes its default. A key that
/// is present must hold a string; an explicit `null` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationEvent {
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default = "default_image_tag")]
    pub image_tag: String,
}

fn default_action() -> String {
    DEFAULT_ACTION.to_string()
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

fn default_image_tag() -> String {
    DEFAULT_IMAGE_TAG.to_string()
}

impl Default for InvocationEvent {
    fn default() -> Self {
        Self {
            action: default_action(),
            target: default_target(),
            image_tag: default_image_tag(),
        }
    }
}

impl InvocationEvent {
    /// Read an event from a raw invocation payload.
    ///
    /// Fails when the payload has the wrong shape (a bare string or number)
    /// or when a recognized key holds anything but a string, `null` included.
    pub fn from_value(payload: Value) -> Result<Self, InvocationError> {
        Ok(serde_json::from_value(payload)?)
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn image_tag(&self) -> &str {
        &self.image_tag
    }

    /// Positional arguments for the script: `action target image_tag`.
    pub fn script_args(&self) -> [&str; 3] {
        [self.action(), self.target(), self.image_tag()]
    }

    pub fn is_status(&self) -> bool {
        self.action() == STATUS_ACTION
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Invocation adapter.
//!
//! Coordinates one invocation end to end:
//! 1. Resolve `action`, `target`, `image_tag` from the event.
//! 2. Best-effort chmod of the script.
//! 3. Run the script with the three values as positional arguments.
//! 4. Classify the outcome and build the [`ResponseEnvelope`].
//!
//! Every error is turned into an envelope here and nowhere else.

use serde_json::Value;

use crate::config::AdapterConfig;
use crate::envelope::ResponseEnvelope;
use crate::error::InvocationError;
use crate::event::InvocationEvent;
use crate::subprocess;

/// Forwards invocation events to the deploy script.
///
/// Holds only immutable configuration, so one adapter can serve any number
/// of invocations.
#[derive(Debug, Clone, Default)]
pub struct InvocationAdapter {
    config: AdapterConfig,
}

impl InvocationAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Handle a raw invocation payload.
    ///
    /// A payload that cannot be read as an event yields a 500 envelope.
    pub async fn handle_payload(&self, payload: Value) -> ResponseEnvelope {
        match InvocationEvent::from_value(payload) {
            Ok(event) => self.handle(event).await,
            Err(err) => {
                tracing::error!(error = %err, "Rejected invocation payload");
                err.into()
            }
        }
    }

    /// Handle one event. Always returns an envelope.
    pub async fn handle(&self, event: InvocationEvent) -> ResponseEnvelope {
        match self.invoke(&event).await {
            Ok(output) => ResponseEnvelope::success(output),
            Err(err) => {
                match &err {
                    InvocationError::ScriptFailure { exit_code, .. } => {
                        tracing::warn!(action = event.action(), exit_code, "Deploy script failed");
                    }
                    InvocationError::Timeout { timeout } => {
                        tracing::error!(
                            action = event.action(),
                            timeout_secs = timeout.as_secs(),
                            "Deploy script timed out",
                        );
                    }
                    other => {
                        tracing::error!(
                            action = event.action(),
                            error = %other,
                            "Deploy script could not be run",
                        );
                    }
                }
                err.into()
            }
        }
    }

    async fn invoke(&self, event: &InvocationEvent) -> Result<Value, InvocationError> {
        let script = &self.config.script_path;

        // A failed chmod is not reported; running the script surfaces any
        // real problem.
        if let Err(e) = subprocess::ensure_executable(script).await {
            tracing::warn!(
                script = %script.display(),
                error = %e,
                "Could not mark script executable",
            );
        }

        tracing::info!(
            action = event.action(),
            target = event.target(),
            image_tag = event.image_tag(),
            script = %script.display(),
            "Invoking deploy script",
        );

        let result =
            subprocess::run_script(script, &event.script_args(), self.config.timeout).await?;

        tracing::info!(
            action = event.action(),
            exit_code = result.exit_code,
            success = result.success(),
            timed_out = result.timed_out,
            elapsed_ms = result.duration_ms,
            "Deploy script finished",
        );

        result.into_output(event.is_status(), self.config.timeout)
    }
}

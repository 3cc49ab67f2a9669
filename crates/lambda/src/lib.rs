//! `deployer-lambda` library crate.
//!
//! Glue between the Lambda Runtime API and [`InvocationAdapter`]. The
//! binary entrypoint lives in `main.rs`.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;

use deployer_core::{InvocationAdapter, ResponseEnvelope};

/// Serve one Lambda invocation.
///
/// The payload is taken as raw JSON so a malformed event still produces an
/// envelope instead of a runtime error. The invocation context is not used.
/// Never returns `Err`.
pub async fn function_handler(
    adapter: &InvocationAdapter,
    event: LambdaEvent<Value>,
) -> Result<ResponseEnvelope, Error> {
    tracing::debug!(request_id = %event.context.request_id, "Received invocation");
    Ok(adapter.handle_payload(event.payload).await)
}

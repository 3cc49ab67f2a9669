//! `deployer-lambda` -- Lambda function that runs the deploy script.
//!
//! Each invocation runs `/var/task/deploy.sh <action> <target> <image_tag>`
//! with a 300-second bound and returns `{statusCode, body}`.
//!
//! # Environment variables
//!
//! | Variable   | Required | Default                                   | Description          |
//! |------------|----------|-------------------------------------------|----------------------|
//! | `RUST_LOG` | no       | `deployer_lambda=info,deployer_core=info` | Log filter directive |
//!
//! Every variable, including any loaded from `.env`, is forwarded to the
//! script unchanged.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deployer_core::{AdapterConfig, InvocationAdapter};
use deployer_lambda::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    // CloudWatch gets one JSON record per line, no colour codes.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deployer_lambda=info,deployer_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json().with_ansi(false))
        .init();

    let adapter = InvocationAdapter::new(AdapterConfig::default());

    tracing::info!(
        script = %adapter.config().script_path.display(),
        timeout_secs = adapter.config().timeout.as_secs(),
        "Starting deployer-lambda",
    );

    let adapter = &adapter;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        function_handler(adapter, event).await
    }))
    .await
}

//! `deployer-core` -- invocation adapter for the deploy script.
//!
//! Turns an invocation event into a call of the external deploy script,
//! bounds it in time, and maps the outcome onto a [`ResponseEnvelope`].
//! Nothing in this crate knows about the hosting runtime; the Lambda
//! entrypoint lives in `deployer-lambda`.

pub mod adapter;
pub mod config;
pub mod envelope;
pub mod error;
pub mod event;
pub mod executor;
pub mod subprocess;

pub use adapter::InvocationAdapter;
pub use config::AdapterConfig;
pub use envelope::{ResponseBody, ResponseEnvelope};
pub use error::InvocationError;
pub use event::InvocationEvent;
pub use executor::ExecutionResult;

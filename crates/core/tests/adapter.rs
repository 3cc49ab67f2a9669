//! Integration tests for the invocation adapter.
//!
//! Each test writes a stub deploy script into a temporary directory and
//! points the adapter at it.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::{json, Value};

use deployer_core::{AdapterConfig, InvocationAdapter, InvocationEvent};

/// Write a stub script with `body` into `dir`, with the given mode.
fn write_stub(dir: &tempfile::TempDir, body: &str, mode: u32) -> PathBuf {
    let path = dir.path().join("deploy.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write stub");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).expect("chmod stub");
    path
}

fn adapter_for(script: PathBuf) -> InvocationAdapter {
    InvocationAdapter::new(
        AdapterConfig::default()
            .with_script_path(script)
            .with_timeout(Duration::from_secs(10)),
    )
}

fn status_event() -> InvocationEvent {
    InvocationEvent {
        action: "status".to_string(),
        ..Default::default()
    }
}

fn raw_body(body: &str) -> Value {
    serde_json::from_str(body).expect("body is JSON")
}

// ---------------------------------------------------------------------------
// Test: defaults
// ---------------------------------------------------------------------------

/// Missing keys reach the script as `deploy both latest`.
#[tokio::test]
async fn missing_keys_are_defaulted() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let script = write_stub(&dir, "printf '%s %s %s' \"$1\" \"$2\" \"$3\"\n", 0o755);

    let envelope = adapter_for(script).handle_payload(json!({})).await;
    assert_eq!(envelope.status_code, 200);
    let body = envelope.parse_body().expect("body");
    assert_eq!(body.output, Some(json!("deploy both latest")));

    let dir = tempfile::tempdir().expect("create temp dir");
    let script = write_stub(&dir, "printf '%s %s %s' \"$1\" \"$2\" \"$3\"\n", 0o755);
    let envelope = adapter_for(script)
        .handle_payload(json!({"target": "frontend", "extra": true}))
        .await;
    let body = envelope.parse_body().expect("body");
    assert_eq!(body.output, Some(json!("deploy frontend latest")));
}

// ---------------------------------------------------------------------------
// Test: success
// ---------------------------------------------------------------------------

/// `status` output that is valid JSON is returned parsed.
#[tokio::test]
async fn status_output_is_parsed() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let script = write_stub(&dir, "echo '{\"state\":\"ok\"}'\n", 0o755);

    let envelope = adapter_for(script).handle(status_event()).await;
    assert_eq!(envelope.status_code, 200);

    let raw = raw_body(&envelope.body);
    assert_eq!(raw["success"], true);
    assert_eq!(raw["output"], json!({"state": "ok"}));
    assert!(raw["error"].is_null());
}

/// Malformed `status` output falls back to the raw text.
#[tokio::test]
async fn malformed_status_output_is_raw_text() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let script = write_stub(&dir, "printf 'state=ok {'\n", 0o755);

    let envelope = adapter_for(script).handle(status_event()).await;
    assert_eq!(envelope.status_code, 200);

    let body = envelope.parse_body().expect("body");
    assert!(body.success);
    assert_eq!(body.output, Some(json!("state=ok {")));
}

/// Non-status actions never parse stdout, even when it is JSON.
#[tokio::test]
async fn deploy_output_is_not_parsed() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let script = write_stub(&dir, "printf '{\"state\":\"ok\"}'\n", 0o755);

    let envelope = adapter_for(script).handle(InvocationEvent::default()).await;
    let body = envelope.parse_body().expect("body");
    assert_eq!(body.output, Some(json!("{\"state\":\"ok\"}")));
}

// ---------------------------------------------------------------------------
// Test: failures
// ---------------------------------------------------------------------------

/// Non-zero exit: 500 with stderr as the error and stdout preserved.
#[tokio::test]
async fn script_failure_reports_stderr() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let script = write_stub(&dir, "printf 'partial'\nprintf 'boom' >&2\nexit 1\n", 0o755);

    let envelope = adapter_for(script).handle(InvocationEvent::default()).await;
    assert_eq!(envelope.status_code, 500);

    let body = envelope.parse_body().expect("body");
    assert!(!body.success);
    assert_eq!(body.error.as_deref(), Some("boom"));
    assert_eq!(body.output, Some(json!("partial")));
}

/// A failing `status` run keeps stdout as raw text.
#[tokio::test]
async fn failed_status_output_is_not_parsed() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let script = write_stub(&dir, "printf '{\"state\":\"down\"}'\nexit 2\n", 0o755);

    let envelope = adapter_for(script).handle(status_event()).await;
    assert_eq!(envelope.status_code, 500);
    let body = envelope.parse_body().expect("body");
    assert_eq!(body.output, Some(json!("{\"state\":\"down\"}")));
}

/// A script outliving the bound yields 504 without an `output` key.
#[tokio::test]
async fn timeout_returns_504() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let script = write_stub(&dir, "exec sleep 30\n", 0o755);
    let adapter = InvocationAdapter::new(
        AdapterConfig::default()
            .with_script_path(script)
            .with_timeout(Duration::from_secs(1)),
    );

    let envelope = adapter.handle(InvocationEvent::default()).await;
    assert_eq!(envelope.status_code, 504);

    let raw = raw_body(&envelope.body);
    assert_eq!(raw["success"], false);
    assert_eq!(raw["error"], "Script execution timed out after 1 seconds");
    assert!(!raw.as_object().expect("object").contains_key("output"));
}

/// A missing script is an unexpected failure, not a panic.
#[tokio::test]
async fn missing_script_returns_500() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let adapter = adapter_for(dir.path().join("nope.sh"));

    let envelope = adapter.handle(InvocationEvent::default()).await;
    assert_eq!(envelope.status_code, 500);

    let raw = raw_body(&envelope.body);
    assert_eq!(raw["success"], false);
    assert!(!raw["error"].as_str().expect("error string").is_empty());
    assert!(!raw.as_object().expect("object").contains_key("output"));
}

/// An explicit `null` does not fall back to a default deploy.
#[tokio::test]
async fn null_keys_return_500_without_running_script() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let marker = dir.path().join("ran");
    let script = write_stub(
        &dir,
        &format!("touch '{}'\nprintf '%s %s %s' \"$1\" \"$2\" \"$3\"\n", marker.display()),
        0o755,
    );

    let envelope = adapter_for(script)
        .handle_payload(json!({"action": null, "target": null, "image_tag": null}))
        .await;
    assert_eq!(envelope.status_code, 500);

    let raw = raw_body(&envelope.body);
    assert_eq!(raw["success"], false);
    assert!(raw["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("Invalid invocation event")));
    assert!(!raw.as_object().expect("object").contains_key("output"));
    assert!(!marker.exists(), "script must not run");
}

/// An unusable payload is reported in the envelope.
#[tokio::test]
async fn invalid_payload_returns_500() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let script = write_stub(&dir, "exit 0\n", 0o755);

    let envelope = adapter_for(script)
        .handle_payload(json!({"action": ["deploy"]}))
        .await;
    assert_eq!(envelope.status_code, 500);
    let body = envelope.parse_body().expect("body");
    assert!(!body.success);
    assert!(body
        .error
        .as_deref()
        .is_some_and(|e| e.starts_with("Invalid invocation event")));
}

// ---------------------------------------------------------------------------
// Test: chmod
// ---------------------------------------------------------------------------

/// A script shipped without execute bits is made executable and runs.
#[tokio::test]
async fn non_executable_script_is_chmodded() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let script = write_stub(&dir, "printf 'ran'\n", 0o644);

    let envelope = adapter_for(script.clone())
        .handle(InvocationEvent::default())
        .await;
    assert_eq!(envelope.status_code, 200);
    assert_eq!(
        envelope.parse_body().expect("body").output,
        Some(json!("ran"))
    );

    let mode = std::fs::metadata(&script).expect("metadata").permissions().mode();
    assert_ne!(mode & 0o111, 0);
}

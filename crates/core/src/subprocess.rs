//! Subprocess management for the deploy script.
//!
//! Provides [`run_script`], which spawns the script with positional
//! arguments, drains stdout/stderr while waiting, and enforces the
//! wall-clock bound, and [`ensure_executable`], the best-effort chmod run
//! before it.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::error::InvocationError;
use crate::executor::ExecutionResult;

/// Add the execute bits to `path` unless it already has one.
pub async fn ensure_executable(path: &Path) -> std::io::Result<()> {
    let metadata = tokio::fs::metadata(path).await?;
    let mut permissions = metadata.permissions();
    let mode = permissions.mode();
    if mode & 0o111 != 0 {
        return Ok(());
    }
    permissions.set_mode(mode | 0o111);
    tokio::fs::set_permissions(path, permissions).await
}

/// Spawn `script` with `args`, capture its output as text, and enforce
/// `timeout`.
///
/// The child inherits the full environment of this process; nothing is
/// added or removed. Stdin is closed. A run that exceeds `timeout` is
/// reported as [`ExecutionResult::timed_out`], and the child is killed when
/// its handle is dropped.
pub async fn run_script(
    script: &Path,
    args: &[&str],
    timeout: Duration,
) -> Result<ExecutionResult, InvocationError> {
    let mut cmd = Command::new(script);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();

    let mut child = cmd.spawn().map_err(InvocationError::Spawn)?;

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    // Both streams are drained while waiting so the child never blocks on a
    // full pipe, and the bound covers reaching EOF on them too.
    let run = async {
        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            read_stream(stdout_handle),
            read_stream(stderr_handle),
        );
        Ok::<_, std::io::Error>((status?, stdout?, stderr?))
    };

    match tokio::time::timeout(timeout, run).await {
        Ok(Ok((status, stdout_bytes, stderr_bytes))) => {
            let stdout = decode("stdout", stdout_bytes)?;
            let stderr = decode("stderr", stderr_bytes)?;
            Ok(ExecutionResult {
                exit_code: status.code().unwrap_or(-1),
                stdout,
                stderr,
                timed_out: false,
                duration_ms: start.elapsed().as_millis() as u64,
            })
        }
        Ok(Err(e)) => Err(InvocationError::Io(e)),
        Err(_elapsed) => {
            // `child` is dropped on return, which kills it (`kill_on_drop`).
            Ok(ExecutionResult::timed_out(start.elapsed().as_millis() as u64))
        }
    }
}

/// Read an entire output stream into a byte buffer.
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        h.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

fn decode(stream: &'static str, bytes: Vec<u8>) -> Result<String, InvocationError> {
    String::from_utf8(bytes).map_err(|source| InvocationError::Encoding { stream, source })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use std::string::FromUtf8Error;
use std::time::Duration;

/// Everything that can go wrong while serving one invocation.
///
/// `ScriptFailure` and `Timeout` describe how the script itself ended; the
/// remaining variants are the catch-all "unexpected failure" class. Each
/// variant maps to the HTTP-style status returned in the envelope.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    /// The script ran to completion with a non-zero exit code.
    #[error("{stderr}")]
    ScriptFailure {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// The script outlived its wall-clock bound and was killed.
    #[error("Script execution timed out after {} seconds", .timeout.as_secs())]
    Timeout { timeout: Duration },

    /// The script could not be started (missing file, permission denied, ...).
    #[error("{0}")]
    Spawn(std::io::Error),

    /// Waiting on the child or draining its output failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Captured output was not valid UTF-8 text.
    #[error("{stream} is not valid UTF-8: {source}")]
    Encoding {
        stream: &'static str,
        #[source]
        source: FromUtf8Error,
    },

    /// The invocation payload could not be read as an event.
    #[error("Invalid invocation event: {0}")]
    InvalidEvent(#[from] serde_json::Error),
}

impl InvocationError {
    /// HTTP-style status code reported for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Timeout { .. } => 504,
            _ => 500,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

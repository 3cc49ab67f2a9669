use std::path::{Path, PathBuf};
use std::time::Duration;

/// Location of the deploy script inside the function package.
pub const DEFAULT_SCRIPT_PATH: &str = "/var/task/deploy.sh";

/// Hard wall-clock bound for one script run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Adapter configuration.
///
/// There are no environment overrides: the whole process environment is
/// forwarded to the script untouched, so the adapter does not claim any
/// variables of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Script invoked for every event.
    pub script_path: PathBuf,
    /// Maximum wall-clock time before the script is killed.
    pub timeout: Duration,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from(DEFAULT_SCRIPT_PATH),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AdapterConfig {
    pub fn with_script_path(mut self, path: impl AsRef<Path>) -> Self {
        self.script_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

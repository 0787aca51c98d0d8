//! Plumbing invocation errors.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Result type for plumbing invocations.
pub type PlumbingResult<T> = Result<T, PlumbingError>;

/// Why a plumbing command produced no output.
#[derive(Debug, Error)]
pub enum PlumbingError {
    /// The executable could not be located. This is a deployment problem and
    /// is reported to callers as-is.
    #[error("{binary}: executable file not found in $PATH")]
    ToolNotFound { binary: String },

    /// The process ran and exited unsuccessfully. Displays as the status,
    /// e.g. `exit status 128`; callers add the operation context.
    #[error("{status}")]
    ExecutionFailed { status: String, stderr: String },

    /// The bare directory for the repository is missing.
    #[error("Repository does not exist")]
    RepositoryNotFound { path: PathBuf },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlumbingError {
    pub fn is_tool_not_found(&self) -> bool {
        matches!(self, PlumbingError::ToolNotFound { .. })
    }

    /// Build an `ExecutionFailed` from a finished process.
    pub fn failed(status: ExitStatus, stderr: &[u8]) -> Self {
        PlumbingError::ExecutionFailed {
            status: describe_status(status),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }
}

/// `exit status <code>`, or a note that a signal ended the process.
pub fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

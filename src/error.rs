//! Error types for cmdwrap
//!
//! Provides structured error types with suggestions for common issues.

use std::fmt;
use std::io;

use serde::Serialize;
use thiserror::Error;

/// One of the two output streams captured from a child process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputStream::Stdout => write!(f, "stdout"),
            OutputStream::Stderr => write!(f, "stderr"),
        }
    }
}

/// Why a process could not be started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnFailureKind {
    /// The executable could not be found on the search path
    NotFound,
    /// The executable or working directory is not accessible
    PermissionDenied,
    /// The working directory does not exist or is not a directory
    InvalidWorkingDirectory,
    /// Anything else the OS reported
    Other,
}

impl fmt::Display for SpawnFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpawnFailureKind::NotFound => "executable not found",
            SpawnFailureKind::PermissionDenied => "permission denied",
            SpawnFailureKind::InvalidWorkingDirectory => "invalid working directory",
            SpawnFailureKind::Other => "spawn error",
        };
        f.write_str(s)
    }
}

/// Main error type for process execution
#[derive(Error, Debug)]
pub enum ExecError {
    /// The process could not be started.
    ///
    /// `exit_code` is the best-effort status extracted from the failure and
    /// is 0 when none was available.
    #[error("Failed to spawn command ({kind}): {command}")]
    SpawnFailed {
        command: String,
        kind: SpawnFailureKind,
        exit_code: i32,
        #[source]
        source: io::Error,
    },

    /// A pipe read-end was not available after spawning
    #[error("Failed to open {stream} pipe")]
    PipeSetup { stream: OutputStream },

    /// Waiting on the process failed
    #[error("Failed to wait for command: {command}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    /// A draining task panicked or was cancelled
    #[error("{stream} reader task failed: {message}")]
    DrainTask {
        stream: OutputStream,
        message: String,
    },

    /// Could not build a runtime for a blocking call
    #[error("Failed to create runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl ExecError {
    /// Exit code reported alongside the error, if the error carries one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecError::SpawnFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    /// Stable identifier for the error variant
    pub fn error_type(&self) -> &'static str {
        match self {
            ExecError::SpawnFailed { .. } => "spawn_failed",
            ExecError::PipeSetup { .. } => "pipe_setup",
            ExecError::Wait { .. } => "wait_failed",
            ExecError::DrainTask { .. } => "drain_task",
            ExecError::Runtime(_) => "runtime",
        }
    }
}

/// Serializable error info for JSON output
#[derive(Debug, Serialize, Clone)]
pub struct ErrorInfo {
    pub message: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&ExecError> for ErrorInfo {
    fn from(err: &ExecError) -> Self {
        let detail = match err {
            ExecError::SpawnFailed { source, .. }
            | ExecError::Wait { source, .. }
            | ExecError::Runtime(source) => Some(source.to_string()),
            _ => None,
        };

        ErrorInfo {
            message: err.to_string(),
            error_type: err.error_type().to_string(),
            suggestion: suggestion_for(err),
            exit_code: err.exit_code(),
            detail,
        }
    }
}

/// Suggest fixes for common failure modes
pub fn suggestion_for(err: &ExecError) -> Option<String> {
    match err {
        ExecError::SpawnFailed { command, kind, .. } => {
            let program = command.split_whitespace().next().unwrap_or(command.as_str());
            let hint = match kind {
                SpawnFailureKind::NotFound => format!(
                    "'{}' was not found. Check PATH or use an absolute path.",
                    program
                ),
                SpawnFailureKind::PermissionDenied => format!(
                    "Permission denied running '{}'. Check the executable bit and directory access.",
                    program
                ),
                SpawnFailureKind::InvalidWorkingDirectory => {
                    "The working directory does not exist. Check the --dir argument or defaults.working_dir."
                        .to_string()
                }
                SpawnFailureKind::Other => return None,
            };
            Some(hint)
        }
        ExecError::Runtime(_) => {
            Some("The system may be out of threads or file descriptors.".to_string())
        }
        _ => None,
    }
}

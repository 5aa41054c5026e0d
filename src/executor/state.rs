//! Terminal status of a finished process

use std::process::ExitStatus;
use std::sync::{Arc, OnceLock};

use serde::Serialize;

/// Exit code reported when the process was terminated by a signal
pub const SIGNALED_EXIT_CODE: i32 = -1;

/// Outcome of a process that has been waited on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessState {
    /// Exit code, or [`SIGNALED_EXIT_CODE`] when killed by a signal
    pub exit_code: i32,
    /// Terminating signal (Unix only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    /// Whether the process exited with code 0
    pub success: bool,
}

impl From<ExitStatus> for ProcessState {
    fn from(status: ExitStatus) -> Self {
        Self {
            exit_code: exit_code_of(&status),
            signal: signal_of(&status),
            success: status.success(),
        }
    }
}

/// Normalize an exit status to an integer exit code
pub fn exit_code_of(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(SIGNALED_EXIT_CODE)
}

#[cfg(unix)]
fn signal_of(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Shared slot holding the [`ProcessState`] once the process was finalized
#[derive(Debug, Clone, Default)]
pub struct ProcessStateHandle(Arc<OnceLock<ProcessState>>);

impl ProcessStateHandle {
    /// The terminal state, or `None` while the process has not been finalized
    pub fn get(&self) -> Option<ProcessState> {
        self.0.get().copied()
    }

    pub fn is_finalized(&self) -> bool {
        self.0.get().is_some()
    }

    pub(crate) fn set(&self, state: ProcessState) {
        if self.0.set(state).is_err() {
            tracing::warn!("process state already recorded");
        }
    }
}

//! Logging collaborator used by the runners
//!
//! Runners never inspect what the logger does with a message; they only
//! emit. Implementations must tolerate concurrent calls from the draining
//! tasks and the calling flow.

/// Leveled sink for runner diagnostics
#[cfg_attr(test, mockall::automock)]
pub trait CommandLogger: Send + Sync {
    /// Informational message (start of a command, exit code)
    fn info(&self, message: &str);

    /// Error message (spawn failures, captured stderr)
    fn error(&self, message: &str);
}

/// Default logger forwarding to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl CommandLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "cmdwrap::command", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "cmdwrap::command", "{}", message);
    }
}

//! Run a command and stream its output while it executes
//!
//! [`CommandWrapper::run_command_async`] returns as soon as the process has
//! started. Output arrives through two [`LineStream`]s fed by background
//! tasks, and the caller releases the process with [`Finalizer::finalize`].

use std::path::PathBuf;

use tokio::process::Child;
use tokio::task::JoinHandle;

use crate::error::{ExecError, OutputStream};
use crate::executor::spawn::{spawn, Spawned};
use crate::executor::spec::CommandSpec;
use crate::executor::state::{ProcessState, ProcessStateHandle};
use crate::executor::stream::{forward, LineStream};
use crate::executor::wrapper::CommandWrapper;

/// A running command whose output is being streamed
#[derive(Debug)]
pub struct AsyncExecution {
    /// Standard output, one line per element, each ending in `\n`
    pub stdout: LineStream,
    /// Standard error, trimmed per line, each ending in `\n`
    pub stderr: LineStream,
    /// Waits for the process and closes both streams
    pub finalizer: Finalizer,
    /// Terminal state, populated once the finalizer has run
    pub state: ProcessStateHandle,
}

impl AsyncExecution {
    /// Split into its parts
    pub fn into_parts(self) -> (LineStream, LineStream, Finalizer, ProcessStateHandle) {
        (self.stdout, self.stderr, self.finalizer, self.state)
    }
}

/// One-shot release action for an [`AsyncExecution`].
///
/// Dropping it without calling [`finalize`](Self::finalize) kills the child
/// so the reader tasks see EOF and exit.
pub struct Finalizer {
    command: String,
    child: Child,
    readers: Vec<(OutputStream, JoinHandle<()>)>,
    state: ProcessStateHandle,
    finalized: bool,
}

impl Finalizer {
    /// Wait for the process to exit and for both streams to reach their end.
    ///
    /// A non-zero exit is reported through the returned [`ProcessState`],
    /// not as an error. After this returns, the line streams yield only lines
    /// already received and then `None`.
    ///
    /// # Errors
    /// * `ExecError::Wait` - waiting on the process failed
    /// * `ExecError::DrainTask` - a reader task panicked
    pub async fn finalize(mut self) -> Result<ProcessState, ExecError> {
        self.finalized = true;

        let status = self.child.wait().await.map_err(|source| ExecError::Wait {
            command: self.command.clone(),
            source,
        })?;

        for (stream, reader) in self.readers.iter_mut() {
            reader.await.map_err(|e| ExecError::DrainTask {
                stream: *stream,
                message: e.to_string(),
            })?;
        }

        let state = ProcessState::from(status);
        tracing::debug!(command = %self.command, exit_code = state.exit_code, "command finalized");
        self.state.set(state);

        Ok(state)
    }

    /// The command line this finalizer belongs to
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl std::fmt::Debug for Finalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Finalizer")
            .field("command", &self.command)
            .field("pid", &self.child.id())
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}

impl Drop for Finalizer {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        tracing::warn!(command = %self.command, "Finalizer dropped without finalize; killing process");
        if let Err(e) = self.child.start_kill() {
            tracing::debug!("Kill on abandoned finalizer failed: {}", e);
        }
    }
}

impl CommandWrapper {
    /// Start `program` with `args` in `dir` and stream its output.
    ///
    /// Returns immediately after the process has started. The caller must
    /// call [`Finalizer::finalize`] to reap the process.
    ///
    /// Dropping the [`Finalizer`] without finalizing kills the process. That
    /// includes discarding it with `..` when destructuring the returned value,
    /// as in `let AsyncExecution { stdout, .. } = wrapper.run_command_async(..)?;`.
    ///
    /// # Errors
    /// * `ExecError::SpawnFailed` - the process could not be started
    /// * `ExecError::PipeSetup` - a pipe read-end was unavailable
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime, since the process and its
    /// reader tasks are registered with the current runtime.
    pub fn run_command_async<I>(
        &self,
        dir: impl Into<PathBuf>,
        program: &str,
        args: I,
    ) -> Result<AsyncExecution, ExecError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let spec = CommandSpec::new(dir, program).args(args);
        self.run_async(&spec)
    }

    /// Start a prepared [`CommandSpec`] and stream its output.
    ///
    /// Same contract as [`run_command_async`](Self::run_command_async),
    /// including killing the process if the [`Finalizer`] is dropped.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn run_async(&self, spec: &CommandSpec) -> Result<AsyncExecution, ExecError> {
        let Spawned {
            child,
            stdout,
            stderr,
        } = spawn(spec, self.logger.as_ref())?;

        let (stdout_tx, stdout_lines) = LineStream::channel(OutputStream::Stdout);
        let (stderr_tx, stderr_lines) = LineStream::channel(OutputStream::Stderr);

        let readers = vec![
            (
                OutputStream::Stdout,
                tokio::spawn(forward(stdout, OutputStream::Stdout, stdout_tx)),
            ),
            (
                OutputStream::Stderr,
                tokio::spawn(forward(stderr, OutputStream::Stderr, stderr_tx)),
            ),
        ];

        let state = ProcessStateHandle::default();
        let finalizer = Finalizer {
            command: spec.to_string(),
            child,
            readers,
            state: state.clone(),
            finalized: false,
        };

        Ok(AsyncExecution {
            stdout: stdout_lines,
            stderr: stderr_lines,
            finalizer,
            state,
        })
    }
}

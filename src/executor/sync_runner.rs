//! Run a command to completion and collect its output
//!
//! The call returns only after the process has exited AND both pipes have
//! been drained, so the captured output is never truncated.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{ExecError, OutputStream};
use crate::executor::spawn::{spawn, Spawned};
use crate::executor::spec::CommandSpec;
use crate::executor::state::exit_code_of;
use crate::executor::stream::accumulate;
use crate::executor::wrapper::CommandWrapper;

/// Result of a completed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    /// Standard output with surrounding whitespace trimmed
    pub stdout: String,
    /// Exit code of the process (-1 when killed by a signal)
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl CommandWrapper {
    /// Run `program` with `args` in the wrapper's directory and wait for it.
    ///
    /// A non-zero exit is not an error; inspect [`CommandOutput::exit_code`].
    ///
    /// # Errors
    /// * `ExecError::SpawnFailed` - the process could not be started
    /// * `ExecError::PipeSetup` - a pipe read-end was unavailable
    /// * `ExecError::Wait` - waiting on the process failed
    pub async fn run_command<I>(&self, program: &str, args: I) -> Result<CommandOutput, ExecError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let spec = CommandSpec::new(self.dir.clone(), program).args(args);
        self.run(&spec).await
    }

    /// Run a prepared [`CommandSpec`] and wait for it
    pub async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        let Spawned {
            mut child,
            stdout,
            stderr,
        } = spawn(spec, self.logger.as_ref())?;

        let stdout_task = tokio::spawn(accumulate(stdout, OutputStream::Stdout));
        let stderr_task = tokio::spawn(accumulate(stderr, OutputStream::Stderr));

        let (status, stdout_buf, stderr_buf) =
            tokio::join!(child.wait(), stdout_task, stderr_task);

        let status = status.map_err(|source| ExecError::Wait {
            command: spec.to_string(),
            source,
        })?;
        let stdout_buf = stdout_buf.map_err(|e| ExecError::DrainTask {
            stream: OutputStream::Stdout,
            message: e.to_string(),
        })?;
        let stderr_buf = stderr_buf.map_err(|e| ExecError::DrainTask {
            stream: OutputStream::Stderr,
            message: e.to_string(),
        })?;

        let stdout = stdout_buf.trim().to_string();

        if !stderr_buf.is_empty() {
            self.logger.error(&stderr_buf);
        }

        let exit_code = exit_code_of(&status);
        self.logger.info(&format!("exited with code {}", exit_code));

        Ok(CommandOutput { stdout, exit_code })
    }

    /// Blocking wrapper around [`run_command`](Self::run_command) for non-async code.
    ///
    /// Builds a private current-thread runtime, so it must not be called from
    /// inside an async context.
    pub fn run_command_blocking<I>(&self, program: &str, args: I) -> Result<CommandOutput, ExecError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let spec = CommandSpec::new(self.dir.clone(), program).args(args);
        self.run_blocking(&spec)
    }

    /// Blocking wrapper around [`run`](Self::run)
    pub fn run_blocking(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ExecError::Runtime)?;

        rt.block_on(self.run(spec))
    }

    /// Run a command in `dir` instead of the wrapper's directory
    pub async fn run_command_in<I>(
        &self,
        dir: impl Into<PathBuf>,
        program: &str,
        args: I,
    ) -> Result<CommandOutput, ExecError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let spec = CommandSpec::new(dir, program).args(args);
        self.run(&spec).await
    }
}

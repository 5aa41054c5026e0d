//! Process start and start-failure classification shared by both runners

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};

use crate::error::{ExecError, OutputStream, SpawnFailureKind};
use crate::executor::spec::CommandSpec;
use crate::logger::CommandLogger;

/// Exit code reported with a spawn failure.
///
/// A process that never started has no wait status, so this is the same
/// value a successful run reports. It only ever travels inside
/// [`ExecError::SpawnFailed`].
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 0;

/// A started child with both read-ends taken
pub(crate) struct Spawned {
    pub child: Child,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Log the invocation, start the process and hand out its pipes
pub(crate) fn spawn(spec: &CommandSpec, logger: &dyn CommandLogger) -> Result<Spawned, ExecError> {
    logger.info(&format!(
        "running command: {} {:?} in {}",
        spec.program(),
        spec.arguments(),
        spec.working_dir().display()
    ));

    if tracing::enabled!(tracing::Level::DEBUG) {
        log_resolved_program(spec);
    }

    let mut cmd = Command::new(spec.program());
    cmd.args(spec.arguments());
    cmd.current_dir(spec.working_dir());
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => return Err(spawn_failure(spec, source, logger)),
    };

    let Some(stdout) = child.stdout.take() else {
        return Err(abandon(child, OutputStream::Stdout));
    };
    let Some(stderr) = child.stderr.take() else {
        return Err(abandon(child, OutputStream::Stderr));
    };

    Ok(Spawned {
        child,
        stdout,
        stderr,
    })
}

// Searches PATH on disk, so only called when debug output is on.
fn log_resolved_program(spec: &CommandSpec) {
    match which::which_in(spec.program(), std::env::var_os("PATH"), spec.working_dir()) {
        Ok(path) => tracing::debug!("Resolved {} to {}", spec.program(), path.display()),
        Err(e) => tracing::debug!("Could not resolve {}: {}", spec.program(), e),
    }
}

fn spawn_failure(spec: &CommandSpec, source: io::Error, logger: &dyn CommandLogger) -> ExecError {
    logger.error("running command failed");
    logger.error(&source.to_string());

    let kind = classify(&source, spec.working_dir());
    tracing::debug!(command = %spec, %kind, "spawn failed");

    ExecError::SpawnFailed {
        command: spec.to_string(),
        kind,
        exit_code: SPAWN_FAILURE_EXIT_CODE,
        source,
    }
}

/// Map a spawn error to a failure kind
pub(crate) fn classify(err: &io::Error, working_dir: &Path) -> SpawnFailureKind {
    if !working_dir.is_dir() {
        return SpawnFailureKind::InvalidWorkingDirectory;
    }
    match err.kind() {
        io::ErrorKind::NotFound => SpawnFailureKind::NotFound,
        io::ErrorKind::PermissionDenied => SpawnFailureKind::PermissionDenied,
        _ => SpawnFailureKind::Other,
    }
}

// No pipe means no output can be read; the child must not outlive the error.
fn abandon(mut child: Child, stream: OutputStream) -> ExecError {
    if let Err(e) = child.start_kill() {
        tracing::warn!("Failed to kill child after {} pipe setup failure: {}", stream, e);
    }
    ExecError::PipeSetup { stream }
}

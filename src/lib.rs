//! cmdwrap - Process execution facade
//!
//! Runs a child process in a working directory and hands back its output,
//! so callers never deal with pipes, concurrent draining or exit-status
//! extraction themselves.
//!
//! ## Runners
//!
//! - [`CommandWrapper::run_command`] - wait for the process, return trimmed
//!   stdout and the exit code; stderr is reported through the logger
//! - [`CommandWrapper::run_command_async`] - return live stdout/stderr line
//!   streams immediately, plus a [`Finalizer`] that reaps the process
//!
//! ## Example
//!
//! ```no_run
//! # async fn demo() -> Result<(), cmdwrap::ExecError> {
//! use cmdwrap::CommandWrapper;
//!
//! let wrapper = CommandWrapper::new("/tmp");
//! let output = wrapper.run_command("echo", ["hello"]).await?;
//! assert_eq!(output.stdout, "hello");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logger;
pub mod logging;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{ErrorInfo, ExecError, OutputStream, SpawnFailureKind};
pub use executor::{
    AsyncExecution, CommandOutput, CommandSpec, CommandWrapper, Finalizer, LineStream,
    ProcessState, ProcessStateHandle,
};
pub use logger::{CommandLogger, TracingLogger};

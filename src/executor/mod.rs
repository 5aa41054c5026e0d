//! Command execution module
//!
//! Provides two ways to run a command:
//! - Run to completion and collect stdout plus the exit code
//! - Start and stream stdout/stderr line by line, then finalize
//!
//! Both share the spawn and start-failure handling in [`spawn`].

pub mod async_runner;
pub mod spawn;
pub mod spec;
pub mod state;
pub mod stream;
pub mod sync_runner;
pub mod wrapper;

pub use async_runner::{AsyncExecution, Finalizer};
pub use spawn::SPAWN_FAILURE_EXIT_CODE;
pub use spec::CommandSpec;
pub use state::{exit_code_of, ProcessState, ProcessStateHandle, SIGNALED_EXIT_CODE};
pub use stream::LineStream;
pub use sync_runner::CommandOutput;
pub use wrapper::CommandWrapper;

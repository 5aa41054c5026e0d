//! Command wrapper bound to a working directory and a logger

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::logger::{CommandLogger, TracingLogger};

/// Runs commands in a default working directory, logging through an
/// injected [`CommandLogger`].
///
/// Cloning is cheap; clones share the logger. Every invocation owns its own
/// process, pipes and buffers, so one wrapper can run many commands
/// concurrently.
#[derive(Clone)]
pub struct CommandWrapper {
    pub(crate) dir: PathBuf,
    pub(crate) logger: Arc<dyn CommandLogger>,
}

impl CommandWrapper {
    /// Create a wrapper that logs through `tracing`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_logger(dir, Arc::new(TracingLogger))
    }

    /// Create a wrapper with a custom logger
    pub fn with_logger(dir: impl Into<PathBuf>, logger: Arc<dyn CommandLogger>) -> Self {
        Self {
            dir: dir.into(),
            logger,
        }
    }

    /// Default working directory for [`run_command`](Self::run_command)
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl fmt::Debug for CommandWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandWrapper")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_dir() {
        let wrapper = CommandWrapper::new("/tmp");
        assert_eq!(wrapper.dir(), Path::new("/tmp"));
        assert!(format!("{:?}", wrapper).contains("/tmp"));
    }

    #[test]
    fn test_wrapper_clone_shares_logger() {
        let wrapper = CommandWrapper::new("/tmp");
        let clone = wrapper.clone();
        assert!(Arc::ptr_eq(&wrapper.logger, &clone.logger));
    }
}

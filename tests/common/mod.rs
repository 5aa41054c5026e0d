//! Common test utilities for cmdwrap tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use cmdwrap::{CommandLogger, CommandWrapper};
use tempfile::TempDir;

/// Level of a recorded log message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// Logger that keeps every message for later inspection
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().expect("logger mutex poisoned").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(Level::Error)
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages(Level::Info)
    }

    fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        self.entries
            .lock()
            .expect("logger mutex poisoned")
            .push((level, message.to_string()));
    }
}

impl CommandLogger for RecordingLogger {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

/// Creates a temporary working directory and a wrapper bound to it
pub fn wrapper_in_temp_dir() -> (TempDir, CommandWrapper, Arc<RecordingLogger>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(RecordingLogger::default());
    let wrapper = CommandWrapper::with_logger(dir.path(), logger.clone());
    (dir, wrapper, logger)
}

/// Creates a temporary directory containing an executable shell script
pub fn create_script(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let script_path = dir.path().join(name);
    std::fs::write(&script_path, content).expect("Failed to write script");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&script_path)
            .expect("Failed to get metadata")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script_path, perms).expect("Failed to set permissions");
    }

    (dir, script_path)
}

/// Script writing interleaved output to both streams
pub const MIXED_OUTPUT_SCRIPT: &str = r#"#!/bin/sh
echo "  stdout one  "
echo "  stderr one  " >&2
echo "stdout two"
echo "stderr two" >&2
exit 4
"#;

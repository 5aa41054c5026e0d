//! Configuration model for cmdwrap
//!
//! Defines the structure for XDG-compliant layered configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Default settings applied to every invocation
    #[serde(default)]
    pub defaults: Defaults,
}

/// Default settings applied to every invocation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Working directory used when `--dir` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    /// Log level for the `cmdwrap` target (overridden by `RUST_LOG`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log line format
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            working_dir: None,
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// Format of emitted log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl Config {
    /// Resolve the working directory for a command.
    ///
    /// Priority: explicit override, then `defaults.working_dir`, then
    /// `current_dir`. A leading `~` expands to the home directory.
    pub fn resolve_working_dir(&self, explicit: Option<&Path>, current_dir: &Path) -> PathBuf {
        let chosen = explicit
            .map(Path::to_path_buf)
            .or_else(|| self.defaults.working_dir.clone());

        match chosen {
            Some(dir) => expand_home(&dir),
            None => current_dir.to_path_buf(),
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

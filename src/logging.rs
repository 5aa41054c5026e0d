//! Logging initialization for the `cmdwrap` binary.
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies to
//! the `cmdwrap` target. Output goes to stderr so stdout carries only the
//! child's output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cmdwrap={}", level)))
}

/// Try to initialize the logging system.
///
/// Returns `Err` if a global subscriber is already installed.
pub fn try_init(level: &str, format: LogFormat) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = build_filter(level);
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
}

/// Initialize the logging system, ignoring a second initialization.
pub fn init(level: &str, format: LogFormat) {
    if try_init(level, format).is_err() {
        tracing::debug!("logging already initialized");
    }
}

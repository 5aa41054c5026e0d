//! Configuration module for cmdwrap
//!
//! Provides XDG-compliant layered configuration loading with
//! environment variable overrides.

pub mod loader;
pub mod model;

pub use loader::{find_config_files, load_config};
pub use model::*;

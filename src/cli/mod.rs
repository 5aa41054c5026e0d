//! CLI module for cmdwrap
//!
//! Provides command-line interface with the following subcommands:
//! - `run` - Run a command and print its captured stdout
//! - `stream` - Run a command and forward output as it arrives
//! - `config` - Show configuration

pub mod commands;

pub use commands::{Cli, Commands};

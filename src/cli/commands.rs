//! CLI command definitions using clap
//!
//! Defines all CLI subcommands and their arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Run a command and capture or stream its output.
#[derive(Parser, Debug)]
#[command(name = "cmdwrap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (overrides default XDG paths)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command to completion and print its trimmed stdout
    Run(RunArgs),

    /// Run a command and forward its output line by line as it arrives
    Stream(StreamArgs),

    /// Show resolved configuration
    Config(ConfigArgs),
}

/// Arguments for the `run` subcommand
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Working directory (defaults to config, then the current directory)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Program to run
    #[arg(required = true)]
    pub program: String,

    /// Arguments passed to the program
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the `stream` subcommand
#[derive(Parser, Debug)]
pub struct StreamArgs {
    /// Working directory (defaults to config, then the current directory)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Program to run
    #[arg(required = true)]
    pub program: String,

    /// Arguments passed to the program
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Output format for `run`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Captured stdout as plain text
    Text,
    /// JSON object with stdout and exit_code
    Json,
}

/// Arguments for the `config` subcommand
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Output format for `config`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_run_simple() {
        let cli = Cli::parse_from(["cmdwrap", "run", "echo", "hello"]);
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.program, "echo");
            assert_eq!(args.args, vec!["hello"]);
            assert!(args.dir.is_none());
            assert_eq!(args.format, OutputFormat::Text);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_with_hyphen_args() {
        let cli = Cli::parse_from([
            "cmdwrap", "run", "-d", "/tmp", "-f", "json", "--", "ls", "-la", "--color=never",
        ]);
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.dir, Some(PathBuf::from("/tmp")));
            assert_eq!(args.format, OutputFormat::Json);
            assert_eq!(args.program, "ls");
            assert_eq!(args.args, vec!["-la", "--color=never"]);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_stream() {
        let cli = Cli::parse_from(["cmdwrap", "-v", "stream", "--", "sh", "-c", "echo hi"]);
        assert!(cli.verbose);
        if let Commands::Stream(args) = cli.command {
            assert_eq!(args.program, "sh");
            assert_eq!(args.args, vec!["-c", "echo hi"]);
        } else {
            panic!("Expected Stream command");
        }
    }

    #[test]
    fn test_cli_parse_config() {
        let cli = Cli::parse_from(["cmdwrap", "--config", "/etc/x.toml", "config", "-f", "json"]);
        assert_eq!(cli.config.as_deref(), Some("/etc/x.toml"));
        if let Commands::Config(args) = cli.command {
            assert_eq!(args.format, ConfigFormat::Json);
        } else {
            panic!("Expected Config command");
        }
    }

    #[test]
    fn test_cli_run_requires_program() {
        assert!(Cli::try_parse_from(["cmdwrap", "run"]).is_err());
    }
}

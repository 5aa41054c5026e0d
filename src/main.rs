//! cmdwrap CLI entry point
//!
//! Usage:
//!   cmdwrap run [-d DIR] [-f json] -- PROGRAM [ARGS...]   Run and print captured stdout
//!   cmdwrap stream [-d DIR] -- PROGRAM [ARGS...]          Forward output as it arrives
//!   cmdwrap config [-f json]                              Show configuration

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use cmdwrap::cli::{
    commands::{ConfigArgs, ConfigFormat, OutputFormat, RunArgs, StreamArgs},
    Cli, Commands,
};
use cmdwrap::config::{find_config_files, load_config, Config};
use cmdwrap::{CommandWrapper, ErrorInfo, ExecError, LineStream};

/// Exit code used when the command could not be started at all
const SPAWN_FAILED_EXIT: u8 = 127;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.defaults.log_level.as_str()
    };
    cmdwrap::logging::init(level, config.defaults.log_format);

    match cli.command {
        Commands::Run(args) => run_command(args, &config).await,
        Commands::Stream(args) => stream_command(args, &config).await,
        Commands::Config(args) => {
            show_config(args, &config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Run a command to completion and print its captured stdout
async fn run_command(args: RunArgs, config: &Config) -> Result<ExitCode> {
    let wrapper = wrapper_for(args.dir.as_deref(), config)?;

    let output = match wrapper.run_command(&args.program, args.args).await {
        Ok(output) => output,
        Err(e) => return report_exec_error(&e, args.format == OutputFormat::Json),
    };

    match args.format {
        OutputFormat::Text => {
            if !output.stdout.is_empty() {
                println!("{}", output.stdout);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(exit_code_for(output.exit_code))
}

/// Run a command and forward each line as soon as it arrives
async fn stream_command(args: StreamArgs, config: &Config) -> Result<ExitCode> {
    let wrapper = wrapper_for(args.dir.as_deref(), config)?;
    let dir = wrapper.dir().to_path_buf();

    let execution = match wrapper.run_command_async(dir, &args.program, args.args) {
        Ok(execution) => execution,
        Err(e) => return report_exec_error(&e, false),
    };
    let (stdout, stderr, finalizer, _state) = execution.into_parts();

    let stdout_task = tokio::spawn(pump(stdout, tokio::io::stdout()));
    let stderr_task = tokio::spawn(pump(stderr, tokio::io::stderr()));

    let state = finalizer
        .finalize()
        .await
        .context("Failed to wait for command")?;

    stdout_task.await.context("stdout forwarder failed")??;
    stderr_task.await.context("stderr forwarder failed")??;

    Ok(exit_code_for(state.exit_code))
}

/// Copy every line of `lines` to `out`, flushing after each one
async fn pump<W>(mut lines: LineStream, mut out: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = lines.next_line().await {
        out.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to forward {}", lines.stream()))?;
        out.flush().await?;
    }
    Ok(())
}

/// Show resolved configuration
fn show_config(args: ConfigArgs, config: &Config) -> Result<()> {
    let files = find_config_files();

    match args.format {
        ConfigFormat::Json => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "config": config,
                "files": files,
            }))?;
            println!("{}", json);
        }
        ConfigFormat::Toml => {
            if files.is_empty() {
                println!("# no config files found, showing defaults");
            }
            for file in &files {
                println!("# loaded: {}", file.display());
            }
            print!("{}", toml::to_string_pretty(config)?);
        }
    }

    Ok(())
}

fn wrapper_for(dir: Option<&Path>, config: &Config) -> Result<CommandWrapper> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(CommandWrapper::new(config.resolve_working_dir(dir, &cwd)))
}

fn report_exec_error(err: &ExecError, json: bool) -> Result<ExitCode> {
    let info = ErrorInfo::from(err);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!("{}: {}", "error".red().bold(), info.message);
        if let Some(detail) = &info.detail {
            eprintln!("  {}", detail);
        }
        if let Some(suggestion) = &info.suggestion {
            eprintln!("{}: {}", "hint".cyan(), suggestion);
        }
    }

    let code = match err {
        ExecError::SpawnFailed { .. } => SPAWN_FAILED_EXIT,
        _ => 1,
    };
    Ok(ExitCode::from(code))
}

fn exit_code_for(code: i32) -> ExitCode {
    ExitCode::from(clamp_exit_code(code))
}

/// Map a child exit code onto the 0..=255 range a process can return
fn clamp_exit_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

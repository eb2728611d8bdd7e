//! `vanna` command-line entry point.

use std::process::ExitCode;

use clap::Parser;

use vanna_cli::cli::{Cli, ColorMode, LogLevel, dispatch_command};
use vanna_cli::styled_output::print_error;

/// Environment variable selecting the log level when no flag is given.
const LOG_LEVEL_ENV_VAR: &str = "VANNA_LOG_LEVEL";

fn log_level(cli: &Cli) -> LogLevel {
    if cli.trace {
        LogLevel::Trace
    } else if cli.verbose {
        LogLevel::Debug
    } else if let Ok(env_level) = std::env::var(LOG_LEVEL_ENV_VAR) {
        LogLevel::from_str_loose(&env_level).unwrap_or(cli.log_level)
    } else {
        cli.log_level
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // SAFETY: no other threads read the environment yet
    match cli.color {
        ColorMode::Never => unsafe { std::env::set_var("NO_COLOR", "1") },
        ColorMode::Always => unsafe { std::env::remove_var("NO_COLOR") },
        ColorMode::Auto => {}
    }

    let level = log_level(&cli).as_filter_str();
    let filter_str = match std::env::var("RUST_LOG") {
        Ok(rust_log) if !rust_log.is_empty() => rust_log,
        _ => format!(
            "warn,vanna={level},vanna_cli={level},vanna_client={level},vanna_login={level},vanna_connectors={level},vanna_common={level}"
        ),
    };
    tracing_subscriber::fmt()
        .with_env_filter(&filter_str)
        .with_writer(std::io::stderr)
        .init();

    match dispatch_command(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

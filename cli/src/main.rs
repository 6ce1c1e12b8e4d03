//! valctl - X1 validator start, sync and staking controller

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use valctl_cli::cli::Cli;
use valctl_cli::domain::{AccountError, ConfigError, ValidatorError};
use valctl_cli::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json
                && let Ok(obj) = json::format_error(&format!("{e:#}"), error_code(&e))
            {
                println!("{obj}");
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn error_code(e: &anyhow::Error) -> &'static str {
    if let Some(err) = e.downcast_ref::<ValidatorError>() {
        return match err {
            ValidatorError::LaunchFailed(_) => "launch_failed",
            ValidatorError::StartupTimeout { .. } => "startup_timeout",
            ValidatorError::CatchupFailed { .. } => "catchup_failed",
            ValidatorError::DelegationFailed { .. } => "delegation_failed",
        };
    }
    if e.downcast_ref::<AccountError>().is_some() {
        return "account_error";
    }
    if e.downcast_ref::<ConfigError>().is_some() {
        return "config_error";
    }
    "error"
}

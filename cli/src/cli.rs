//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;

/// Start, sync and stake an X1 validator
#[derive(Parser)]
#[command(
    name = "valctl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log diagnostics to stderr (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the validator if needed, wait for sync, delegate stake
    Activate,

    /// Create or repair the stake and vote accounts
    Accounts,

    /// Show validator and key status
    Status,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
            ..
        } = self;

        let flags = OutputFlags {
            no_color,
            quiet,
            json,
        };
        let app = || AppContext::new(&flags);
        match command {
            Command::Activate => commands::activate::run(&app()?).await,
            Command::Accounts => commands::accounts::run(&app()?).await,
            Command::Status => commands::status::run(&app()?).await,
            Command::Config(cmd) => commands::config::run(&app()?, cmd),
            Command::Version => {
                commands::version::run(json);
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

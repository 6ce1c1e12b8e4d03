//! Application context — unified state passed to every command handler.
//!
//! Built once in `Cli::run()`; handlers take `&AppContext` instead of
//! constructing their own runners and stores.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::domain::ValctlConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags passed from the top-level CLI.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// External command runner.
    pub runner: TokioCommandRunner,
    /// Local filesystem.
    pub fs: LocalFs,
    /// YAML config store.
    pub config_store: YamlConfigStore,
    /// Effective configuration, defaults applied.
    pub config: ValctlConfig,
    /// Home directory used to expand `~/` in configured paths.
    pub home: PathBuf,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or the
    /// config file exists but cannot be parsed.
    pub fn new(flags: &OutputFlags) -> Result<Self> {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        let config_store = YamlConfigStore;
        let config = config_service::load_config(&config_store)?;
        tracing::debug!(path = ?config_store.path().ok(), "configuration loaded");

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            runner: TokioCommandRunner::default(),
            fs: LocalFs,
            config_store,
            config,
            home,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }
}

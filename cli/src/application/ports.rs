//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::ValctlConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with no timeout; it runs until it exits on its own.
    async fn run_to_completion(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Launch a program in `cwd` without waiting and without keeping a handle.
    ///
    /// The process must outlive the caller. Returns its pid.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn spawn_detached(&self, program: &str, args: &[&str], cwd: &Path) -> Result<u32>;
}

// ── Port Probe Port ───────────────────────────────────────────────────────────

/// Answers whether a local TCP port has a listener.
#[allow(async_fn_in_trait)]
pub trait PortProbe {
    /// `true` if some process is bound to `port`.
    async fn is_listening(&self, port: u16) -> Result<bool>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Replace the message of the current step (countdowns, attempt counters).
    fn update(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a block of detail text, such as command output.
    fn detail(&self, text: &str);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the local filesystem operations used by provisioning.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Move `from` to `to`. Must fail rather than silently overwrite nothing.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    /// Write `content` to `path` atomically (temp file + rename).
    fn write_atomic(&self, path: &Path, content: &str) -> Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading and saving the user configuration.
pub trait ConfigStore {
    /// Load the config, falling back to defaults when no file exists.
    fn load(&self) -> Result<ValctlConfig>;
    /// Persist the config.
    fn save(&self, config: &ValctlConfig) -> Result<()>;
    /// Location of the config file.
    fn path(&self) -> Result<PathBuf>;
}

//! Terminal output for `valctl` commands.
//!
//! Plain messages go to stdout and errors to stderr. `--json` output bypasses
//! this module and prints through [`json`].

pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// How a command renders its human-readable output.
pub struct OutputContext {
    pub styles: Styles,
    /// Spinners are only drawn on a TTY.
    pub is_tty: bool,
    /// Set by `-q` and by `--json`; errors still print.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a TTY with neither `--no-color` nor `NO_COLOR` set.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let styles = if !no_color && is_tty && std::env::var("NO_COLOR").is_err() {
            Styles::colored()
        } else {
            Styles::default()
        };

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Whether the reporter may draw a spinner while a validator command runs.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// `✓ msg`, e.g. a created account or a delegation.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// `⚠ msg` for recoverable conditions such as an archived key.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// `✗ msg` on stderr, printed even in quiet mode.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// `ℹ msg`; used for the restart reminder after delegation.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Title line of one account's report.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// One `status` line: dimmed key, then value.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }

    /// Wallet CLI output excerpt, indented under its header.
    pub fn block(&self, text: &str) {
        if self.quiet {
            return;
        }
        for line in text.lines() {
            println!("    {}", line.style(self.styles.dim));
        }
    }
}

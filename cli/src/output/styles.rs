//! Colors for `valctl` terminal output.

use owo_colors::Style;

/// Colors used by [`super::OutputContext`] and the progress reporter.
///
/// The default value is uncolored, which is what `--no-color`, `NO_COLOR` and
/// piped stdout get.
#[derive(Default, Clone)]
pub struct Styles {
    /// `✓` after an account is created or stake is delegated.
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    /// `→` in front of each lifecycle and provisioning step.
    pub step: Style,
    /// Command output excerpts and status keys.
    pub dim: Style,
    /// Per-account section titles.
    pub header: Style,
}

impl Styles {
    /// Stylesheet for a color terminal.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            info: Style::new().blue(),
            step: Style::new().cyan(),
            dim: Style::new().dimmed(),
            header: Style::new().bold().cyan(),
        }
    }
}

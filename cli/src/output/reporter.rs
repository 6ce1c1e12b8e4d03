//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY each `step()` becomes a spinner whose text `update()` rewrites in
/// place; the next event freezes it. Without a TTY every event is one line.
/// All events except errors are suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    fn settle(&self) {
        if let Some(pb) = self.active.borrow_mut().take() {
            progress::finish_step(&pb);
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        self.settle();
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.settle();
        if self.ctx.show_progress() {
            *self.active.borrow_mut() = Some(progress::spinner(message));
        } else if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn update(&self, message: &str) {
        if let Some(pb) = self.active.borrow().as_ref() {
            pb.set_message(message.to_string());
            return;
        }
        if !self.ctx.quiet {
            println!("    {message}");
        }
    }

    fn success(&self, message: &str) {
        if let Some(pb) = self.active.borrow_mut().take() {
            progress::finish_ok(&pb, message);
            return;
        }
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.settle();
        self.ctx.warn(message);
    }

    fn detail(&self, text: &str) {
        self.settle();
        self.ctx.block(text);
    }
}

//! JSON output helpers.
//!
//! Every `--json` code path prints one pretty-printed document to stdout,
//! either the command's payload or the error object below.

use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty-print a command payload.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn format_json(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::account::AccountKind;

// ── Validator errors ──────────────────────────────────────────────────────────

/// Terminal failures of the validator lifecycle.
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("Error starting validator: {0}")]
    LaunchFailed(String),

    #[error(
        "Failed to start the validator. Port {port} is still not in use after {attempts} checks. \
         Check logs for fatal error"
    )]
    StartupTimeout { attempts: u32, port: u16 },

    #[error("Error running catchup: {stderr}")]
    CatchupFailed { stderr: String },

    #[error("Error delegating stake: {stderr}")]
    DelegationFailed { stderr: String },
}

// ── Account errors ────────────────────────────────────────────────────────────

/// Failures of the account provisioning workflow, one account kind at a time.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Error checking {kind} account: {stderr}")]
    InspectionFailed { kind: AccountKind, stderr: String },

    #[error("Error moving {kind} key to archive {}: {reason}", path.display())]
    ArchiveFailed {
        kind: AccountKind,
        path: PathBuf,
        reason: String,
    },

    #[error("Error generating new {kind} key at {}: {stderr}", path.display())]
    KeygenFailed {
        kind: AccountKind,
        path: PathBuf,
        stderr: String,
    },

    #[error("Error creating {kind} account: {stderr}")]
    CreateFailed { kind: AccountKind, stderr: String },

    #[error("Error checking new {kind} account: {stderr}")]
    ConfirmFailed { kind: AccountKind, stderr: String },

    #[error("{kind} key not found at {}", path.display())]
    MissingKey { kind: AccountKind, path: PathBuf },

    #[error("Error reading {kind} address: {stderr}")]
    AddressLookupFailed { kind: AccountKind, stderr: String },

    #[error("'{address}' is not a valid {kind} address")]
    InvalidAddress { kind: AccountKind, address: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

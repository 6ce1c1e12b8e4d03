//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod account;
pub mod config;
pub mod error;
pub mod validator;

pub use account::{
    AccountClassification, AccountKind, AccountRecord, AccountReport, ProvisioningOutcome,
};
pub use config::{AccountSettings, KeyPaths, RecordPaths, ValctlConfig};
pub use error::{AccountError, ConfigError, ValidatorError};
pub use validator::{LifecycleOutcome, LifecycleState, SyncStatus, ValidatorSettings};

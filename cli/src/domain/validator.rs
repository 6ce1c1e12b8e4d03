//! Validator launch flags, catch-up classification, and lifecycle states.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// Wallet CLI used for queries, catch-up and delegation.
pub const SOLANA_CLI: &str = "solana";

/// Key generation and inspection CLI.
pub const KEYGEN_CLI: &str = "solana-keygen";

/// Phrase printed by `solana catchup` once the local node is in sync.
pub const CAUGHT_UP_MARKER: &str = "has caught up";

/// Timeout for wallet commands that submit a transaction and await confirmation.
pub const TRANSACTION_TIMEOUT: Duration = Duration::from_secs(120);

/// Synchronization state reported by the catch-up command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStatus {
    CaughtUp,
    NotCaughtUp,
}

/// Classify successful catch-up output.
#[must_use]
pub fn classify_catchup(stdout: &str) -> SyncStatus {
    if stdout.contains(CAUGHT_UP_MARKER) {
        SyncStatus::CaughtUp
    } else {
        SyncStatus::NotCaughtUp
    }
}

/// States of the start-or-delegate state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unknown,
    Running,
    NotRunning,
    Starting,
    Polling { attempt: u32 },
    Synced,
    Delegated,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Unknown => f.write_str("unknown"),
            LifecycleState::Running => f.write_str("running"),
            LifecycleState::NotRunning => f.write_str("not-running"),
            LifecycleState::Starting => f.write_str("starting"),
            LifecycleState::Polling { attempt } => write!(f, "polling({attempt})"),
            LifecycleState::Synced => f.write_str("synced"),
            LifecycleState::Delegated => f.write_str("delegated"),
        }
    }
}

/// Terminal, non-error results of `activate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// Stake was delegated; the validator must be restarted to vote with it.
    Delegated { output: String },
    /// The node ran catch-up but did not report being in sync.
    NotCaughtUp { output: String },
}

/// Fixed operational flags for the validator process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub log_path: PathBuf,
    pub rpc_port: u16,
    pub limit_ledger_size: u64,
    pub max_genesis_archive_unpacked_size: u64,
    pub entrypoint: String,
    pub known_validator: String,
    pub expected_shred_version: u32,
}

impl LaunchSpec {
    /// Command-line arguments, relative to the validator directory.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        vec![
            "--identity".into(),
            "identity.json".into(),
            "--limit-ledger-size".into(),
            self.limit_ledger_size.to_string(),
            "--log".into(),
            self.log_path.to_string_lossy().into_owned(),
            "--vote-account".into(),
            "vote.json".into(),
            "--rpc-port".into(),
            self.rpc_port.to_string(),
            "--full-rpc-api".into(),
            "--max-genesis-archive-unpacked-size".into(),
            self.max_genesis_archive_unpacked_size.to_string(),
            "--enable-rpc-transaction-history".into(),
            "--enable-extended-tx-metadata-storage".into(),
            "--rpc-pubsub-enable-block-subscription".into(),
            "--entrypoint".into(),
            self.entrypoint.clone(),
            "--only-known-rpc".into(),
            "--known-validator".into(),
            self.known_validator.clone(),
            "--expected-shred-version".into(),
            self.expected_shred_version.to_string(),
        ]
    }
}

/// Everything the lifecycle controller needs, with paths already resolved.
#[derive(Debug, Clone)]
pub struct ValidatorSettings {
    /// Validator binary, e.g. `agave-validator`.
    pub binary: String,
    /// Working directory holding `identity.json`, `vote.json` and `stake.json`.
    pub dir: PathBuf,
    pub launch: LaunchSpec,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
    pub stabilization: Duration,
}

impl ValidatorSettings {
    /// Stake keypair delegated by `solana delegate-stake`.
    #[must_use]
    pub fn stake_keypair(&self) -> PathBuf {
        self.dir.join("stake.json")
    }

    /// Vote account the stake is delegated to.
    #[must_use]
    pub fn vote_keypair(&self) -> PathBuf {
        self.dir.join("vote.json")
    }
}

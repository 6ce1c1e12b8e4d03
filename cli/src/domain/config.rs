//! Domain types and validators for valctl configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::account::AccountKind;
use crate::domain::error::ConfigError;
use crate::domain::validator::{LaunchSpec, ValidatorSettings};

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "validator.binary",
    "validator.dir",
    "validator.log_path",
    "validator.rpc_port",
    "validator.entrypoint",
    "validator.known_validator",
    "validator.expected_shred_version",
    "validator.limit_ledger_size",
    "validator.poll_attempts",
    "validator.poll_interval_secs",
    "validator.stabilization_secs",
    "accounts.keys_dir",
    "accounts.archive_dir",
    "accounts.stake_amount",
    "accounts.commission",
    "record.primary",
    "record.secondary",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.valctl/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ValctlConfig {
    pub validator: ValidatorConfig,
    pub accounts: AccountsConfig,
    pub record: RecordConfig,
}

/// Validator process settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValidatorConfig {
    pub binary: String,
    pub dir: String,
    pub log_path: String,
    pub rpc_port: u16,
    pub entrypoint: String,
    pub known_validator: String,
    pub expected_shred_version: u32,
    pub limit_ledger_size: u64,
    pub max_genesis_archive_unpacked_size: u64,
    pub poll_attempts: u32,
    pub poll_interval_secs: u64,
    pub stabilization_secs: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            binary: "agave-validator".to_string(),
            dir: "~/x1/agave-xolana".to_string(),
            log_path: "~/x1/log.txt".to_string(),
            rpc_port: 8899,
            entrypoint: "xolana.xen.network:8001".to_string(),
            known_validator: "C58LhVv822GiE3s84pwb58yiaezWLaFFdUtTWDGFySsU".to_string(),
            expected_shred_version: 19582,
            limit_ledger_size: 50_000_000,
            max_genesis_archive_unpacked_size: 1_073_741_824,
            poll_attempts: 10,
            poll_interval_secs: 5,
            stabilization_secs: 10,
        }
    }
}

/// Keypair locations and account creation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccountsConfig {
    pub keys_dir: String,
    pub archive_dir: String,
    /// Amount passed to `create-stake-account`, kept verbatim.
    pub stake_amount: String,
    /// Vote account commission, in percent.
    pub commission: u8,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            keys_dir: "~/.config/solana".to_string(),
            archive_dir: "~/.config/solana/archive".to_string(),
            stake_amount: "2".to_string(),
            commission: 10,
        }
    }
}

/// Where the summary of account addresses is written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RecordConfig {
    pub primary: String,
    /// Copy read by the X1 console.
    pub secondary: String,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            primary: "~/x1console/wallets.json".to_string(),
            secondary: "~/x1/solanalabs/wallets.json".to_string(),
        }
    }
}

// ── Resolved settings ────────────────────────────────────────────────────────

/// Canonical keypair paths for the four accounts plus the archive directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    pub identity: PathBuf,
    pub withdrawer: PathBuf,
    pub stake: PathBuf,
    pub vote: PathBuf,
    pub archive_dir: PathBuf,
}

impl KeyPaths {
    /// Live keypair path for `kind`.
    #[must_use]
    pub fn path(&self, kind: AccountKind) -> &Path {
        match kind {
            AccountKind::Identity => &self.identity,
            AccountKind::Withdrawer => &self.withdrawer,
            AccountKind::Stake => &self.stake,
            AccountKind::Vote => &self.vote,
        }
    }
}

/// Inputs of the account provisioning workflow.
#[derive(Debug, Clone)]
pub struct AccountSettings {
    pub keys: KeyPaths,
    pub stake_amount: String,
    pub commission: u8,
}

/// Primary and secondary summary record locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPaths {
    pub primary: PathBuf,
    pub secondary: PathBuf,
}

/// Expand a leading `~/` against `home`.
#[must_use]
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

impl ValctlConfig {
    /// Settings for the lifecycle controller.
    #[must_use]
    pub fn validator_settings(&self, home: &Path) -> ValidatorSettings {
        let v = &self.validator;
        ValidatorSettings {
            binary: v.binary.clone(),
            dir: expand_home(&v.dir, home),
            launch: LaunchSpec {
                log_path: expand_home(&v.log_path, home),
                rpc_port: v.rpc_port,
                limit_ledger_size: v.limit_ledger_size,
                max_genesis_archive_unpacked_size: v.max_genesis_archive_unpacked_size,
                entrypoint: v.entrypoint.clone(),
                known_validator: v.known_validator.clone(),
                expected_shred_version: v.expected_shred_version,
            },
            poll_attempts: v.poll_attempts,
            poll_interval: Duration::from_secs(v.poll_interval_secs),
            stabilization: Duration::from_secs(v.stabilization_secs),
        }
    }

    /// Settings for the provisioning workflow.
    #[must_use]
    pub fn account_settings(&self, home: &Path) -> AccountSettings {
        let keys_dir = expand_home(&self.accounts.keys_dir, home);
        AccountSettings {
            keys: KeyPaths {
                identity: keys_dir.join(AccountKind::Identity.key_file()),
                withdrawer: keys_dir.join(AccountKind::Withdrawer.key_file()),
                stake: keys_dir.join(AccountKind::Stake.key_file()),
                vote: keys_dir.join(AccountKind::Vote.key_file()),
                archive_dir: expand_home(&self.accounts.archive_dir, home),
            },
            stake_amount: self.accounts.stake_amount.clone(),
            commission: self.accounts.commission,
        }
    }

    /// Summary record destinations.
    #[must_use]
    pub fn record_paths(&self, home: &Path) -> RecordPaths {
        RecordPaths {
            primary: expand_home(&self.record.primary, home),
            secondary: expand_home(&self.record.secondary, home),
        }
    }

    /// Validate and assign a single setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for keys outside the whitelist and
    /// [`ConfigError::InvalidValue`] when the value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        validate_config_key(key)?;
        let v = &mut self.validator;
        let a = &mut self.accounts;
        match key {
            "validator.binary" => v.binary = non_empty(key, value)?,
            "validator.dir" => v.dir = non_empty(key, value)?,
            "validator.log_path" => v.log_path = non_empty(key, value)?,
            "validator.rpc_port" => v.rpc_port = number(key, value, "a port number (1-65535)")?,
            "validator.entrypoint" => v.entrypoint = non_empty(key, value)?,
            "validator.known_validator" => v.known_validator = non_empty(key, value)?,
            "validator.expected_shred_version" => {
                v.expected_shred_version = number(key, value, "a shred version")?;
            }
            "validator.limit_ledger_size" => {
                v.limit_ledger_size = number(key, value, "a number of shreds")?;
            }
            "validator.poll_attempts" => {
                v.poll_attempts = number(key, value, "a positive number of checks")?;
            }
            "validator.poll_interval_secs" => {
                v.poll_interval_secs = number(key, value, "seconds between checks")?;
            }
            "validator.stabilization_secs" => {
                v.stabilization_secs = number(key, value, "seconds to wait")?;
            }
            "accounts.keys_dir" => a.keys_dir = non_empty(key, value)?,
            "accounts.archive_dir" => a.archive_dir = non_empty(key, value)?,
            "accounts.stake_amount" => {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite() && *n > 0.0)
                    .ok_or_else(|| invalid(key, value, "a positive amount"))?;
                a.stake_amount = value.to_string();
            }
            "accounts.commission" => {
                let pct: u8 = number(key, value, "a percentage (0-100)")?;
                if pct > 100 {
                    return Err(invalid(key, value, "a percentage (0-100)"));
                }
                a.commission = pct;
            }
            "record.primary" => self.record.primary = non_empty(key, value)?,
            "record.secondary" => self.record.secondary = non_empty(key, value)?,
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                    valid: VALID_CONFIG_KEYS.join(", "),
                });
            }
        }
        if self.validator.rpc_port == 0 || self.validator.poll_attempts == 0 {
            return Err(invalid(key, value, "a non-zero value"));
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<(), ConfigError> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        });
    }
    Ok(())
}

fn invalid(key: &str, value: &str, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(key, value, "a non-empty value"));
    }
    Ok(value.to_string())
}

fn number<T: std::str::FromStr>(key: &str, value: &str, expected: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| invalid(key, value, expected))
}

// ── Unit tests ───────────────────────────────────────────────────────────────

//! Account kinds, on-chain classification, and provisioning outcomes.
//!
//! The wallet CLI reports account state only as free text on stderr, so every
//! textual trigger lives here and nothing outside this module inspects raw
//! query output.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::AccountError;

/// Number of query output lines echoed back after each action.
pub const EXCERPT_LINES: usize = 10;

/// Substrings on stderr meaning the account is not on-chain yet.
///
/// `AccountNotFound` is what `solana stake-account` prints; the vote query
/// prints `account does not exist`.
pub const ABSENT_MARKERS: &[&str] = &["AccountNotFound", "not found", "does not exist"];

/// Base58 public key, as printed by `solana-keygen pubkey`.
pub static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("valid regex")
});

/// The four accounts a validator operates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    Identity,
    Withdrawer,
    Stake,
    Vote,
}

impl AccountKind {
    /// Kinds this tool creates and repairs. Identity and withdrawer are inputs.
    pub const PROVISIONED: [AccountKind; 2] = [AccountKind::Stake, AccountKind::Vote];

    /// Order of entries in the summary record.
    pub const RECORD_ORDER: [AccountKind; 4] = [
        AccountKind::Withdrawer,
        AccountKind::Identity,
        AccountKind::Stake,
        AccountKind::Vote,
    ];

    /// Keypair file name inside the keys directory.
    #[must_use]
    pub fn key_file(self) -> &'static str {
        match self {
            AccountKind::Identity => "identity.json",
            AccountKind::Withdrawer => "id.json",
            AccountKind::Stake => "stake.json",
            AccountKind::Vote => "vote.json",
        }
    }

    /// `solana` subcommand that shows this account, if it is queryable.
    #[must_use]
    pub fn query_subcommand(self) -> Option<&'static str> {
        match self {
            AccountKind::Stake => Some("stake-account"),
            AccountKind::Vote => Some("vote-account"),
            AccountKind::Identity | AccountKind::Withdrawer => None,
        }
    }

    /// Stderr text reported when the address holds some other account type.
    #[must_use]
    pub fn wrong_type_marker(self) -> Option<&'static str> {
        match self {
            AccountKind::Stake => Some("is not a stake account"),
            AccountKind::Vote => Some("is not a vote account"),
            AccountKind::Identity | AccountKind::Withdrawer => None,
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccountKind::Identity => "identity",
            AccountKind::Withdrawer => "withdrawer",
            AccountKind::Stake => "stake",
            AccountKind::Vote => "vote",
        })
    }
}

/// On-chain state of an account, derived from one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountClassification {
    Absent,
    WrongType,
    Correct,
}

/// What a provisioning run did for one account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisioningOutcome {
    Unchanged,
    Created,
    Recreated,
}

impl ProvisioningOutcome {
    /// `true` when the run produced a new on-chain account.
    #[must_use]
    pub fn is_change(self) -> bool {
        matches!(self, ProvisioningOutcome::Created | ProvisioningOutcome::Recreated)
    }
}

/// Result of provisioning a single account kind.
#[derive(Debug, Clone, Serialize)]
pub struct AccountReport {
    pub kind: AccountKind,
    pub outcome: ProvisioningOutcome,
    /// Leading lines of the confirming query.
    pub excerpt: String,
    /// Set when the account was created but the confirming query failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_error: Option<String>,
}

/// One entry of the summary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: AccountKind,
    pub address: String,
}

/// Classify an account query from its exit status and stderr.
///
/// Markers are checked before the exit status because the wallet CLI is not
/// consistent about exit codes for these conditions.
///
/// # Errors
///
/// Returns [`AccountError::InspectionFailed`] when the query failed with text
/// that matches no known condition.
pub fn classify(
    kind: AccountKind,
    success: bool,
    stderr: &str,
) -> Result<AccountClassification, AccountError> {
    if ABSENT_MARKERS.iter().any(|m| stderr.contains(m)) {
        return Ok(AccountClassification::Absent);
    }
    if kind
        .wrong_type_marker()
        .is_some_and(|m| stderr.contains(m))
    {
        return Ok(AccountClassification::WrongType);
    }
    if success {
        return Ok(AccountClassification::Correct);
    }
    Err(AccountError::InspectionFailed {
        kind,
        stderr: stderr.trim().to_string(),
    })
}

/// First [`EXCERPT_LINES`] lines of a query's stdout.
#[must_use]
pub fn excerpt(stdout: &str) -> String {
    stdout
        .lines()
        .take(EXCERPT_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `true` if any outcome in the run created an account.
pub fn any_changed(outcomes: impl IntoIterator<Item = ProvisioningOutcome>) -> bool {
    outcomes.into_iter().any(ProvisioningOutcome::is_change)
}

/// Validate the trimmed output of an address lookup.
///
/// # Errors
///
/// Returns [`AccountError::InvalidAddress`] if the text is not a base58 key.
pub fn parse_address(kind: AccountKind, stdout: &str) -> Result<String, AccountError> {
    let address = stdout.trim();
    if ADDRESS_RE.is_match(address) {
        Ok(address.to_string())
    } else {
        Err(AccountError::InvalidAddress {
            kind,
            address: address.to_string(),
        })
    }
}

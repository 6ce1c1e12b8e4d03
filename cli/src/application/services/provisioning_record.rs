//! Application service — summary record of account addresses.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, LocalFs, ProgressReporter};
use crate::domain::account::{self, ProvisioningOutcome};
use crate::domain::validator::KEYGEN_CLI;
use crate::domain::{AccountError, AccountKind, AccountRecord, KeyPaths, RecordPaths};

/// Resolve the public address of the keypair at `path`.
///
/// # Errors
///
/// Returns [`AccountError::AddressLookupFailed`] if the lookup command fails
/// and [`AccountError::InvalidAddress`] if it prints something that is not a
/// base58 key.
pub async fn lookup_address(
    runner: &impl CommandRunner,
    kind: AccountKind,
    path: &Path,
) -> Result<String> {
    let path = path.to_string_lossy();
    let output = runner
        .run(KEYGEN_CLI, &["pubkey", &path])
        .await
        .map_err(|e| AccountError::AddressLookupFailed {
            kind,
            stderr: format!("{e:#}"),
        })?;
    if !output.status.success() {
        return Err(AccountError::AddressLookupFailed {
            kind,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }
    Ok(account::parse_address(
        kind,
        &String::from_utf8_lossy(&output.stdout),
    )?)
}

/// Resolve all four addresses in record order.
pub async fn collect_records(
    runner: &impl CommandRunner,
    keys: &KeyPaths,
) -> Result<Vec<AccountRecord>> {
    let mut records = Vec::with_capacity(AccountKind::RECORD_ORDER.len());
    for kind in AccountKind::RECORD_ORDER {
        let address = lookup_address(runner, kind, keys.path(kind)).await?;
        records.push(AccountRecord {
            name: kind,
            address,
        });
    }
    Ok(records)
}

/// Write the summary record when at least one account was created.
///
/// Returns the written records, or `None` when nothing changed. In that case
/// neither file is touched and no address is looked up.
///
/// # Errors
///
/// Returns an error if an address cannot be resolved or either file cannot
/// be written.
pub async fn write_if_changed(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    keys: &KeyPaths,
    paths: &RecordPaths,
    outcomes: &[ProvisioningOutcome],
) -> Result<Option<Vec<AccountRecord>>> {
    if !account::any_changed(outcomes.iter().copied()) {
        reporter.step("No new wallets were created; wallets.json will not be generated.");
        return Ok(None);
    }

    let records = collect_records(runner, keys).await?;
    let json = serde_json::to_string_pretty(&records).context("failed to serialize records")?;

    ensure_parent(fs, &paths.primary)?;
    fs.write_atomic(&paths.primary, &json)
        .with_context(|| format!("failed to write {}", paths.primary.display()))?;
    reporter.success(&format!("Wallet addresses saved to {}", paths.primary.display()));

    ensure_parent(fs, &paths.secondary)?;
    fs.copy(&paths.primary, &paths.secondary)
        .with_context(|| format!("failed to copy record to {}", paths.secondary.display()))?;
    reporter.success(&format!("Copied to {}", paths.secondary.display()));

    tracing::info!(
        primary = %paths.primary.display(),
        secondary = %paths.secondary.display(),
        "summary record written"
    );
    Ok(Some(records))
}

fn ensure_parent(fs: &impl LocalFs, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !fs.exists(parent)
    {
        fs.create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

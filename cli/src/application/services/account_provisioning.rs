//! Application service — account provisioning use-case.
//!
//! Stake and vote accounts are inspected and repaired independently and
//! concurrently, then the summary record is written through
//! [`provisioning_record`] when either changed.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::application::ports::{CommandRunner, LocalFs, ProgressReporter};
use crate::application::services::provisioning_record;
use crate::domain::account::{self, ProvisioningOutcome};
use crate::domain::validator::{KEYGEN_CLI, SOLANA_CLI, TRANSACTION_TIMEOUT};
use crate::domain::{
    AccountClassification, AccountError, AccountKind, AccountRecord, AccountReport,
    AccountSettings, KeyPaths, RecordPaths,
};

/// Per-kind results of one provisioning run. A failure of one kind never
/// hides the result of the other.
#[derive(Debug)]
pub struct ProvisioningRun {
    pub stake: Result<AccountReport>,
    pub vote: Result<AccountReport>,
}

impl ProvisioningRun {
    /// Outcomes of the kinds whose workflow got past account creation.
    ///
    /// An account that was created but could not be confirmed still counts.
    #[must_use]
    pub fn outcomes(&self) -> Vec<ProvisioningOutcome> {
        [&self.stake, &self.vote]
            .into_iter()
            .filter_map(|r| r.as_ref().ok().map(|report| report.outcome))
            .collect()
    }

    /// Failed kinds with their error messages, unconfirmed creations included.
    #[must_use]
    pub fn failures(&self) -> Vec<(AccountKind, String)> {
        [(AccountKind::Stake, &self.stake), (AccountKind::Vote, &self.vote)]
            .into_iter()
            .filter_map(|(kind, r)| match r {
                Ok(report) => report.confirm_error.clone().map(|e| (kind, e)),
                Err(e) => Some((kind, format!("{e:#}"))),
            })
            .collect()
    }
}

/// A provisioning run plus the outcome of writing the summary record.
#[derive(Debug)]
pub struct AccountsSummary {
    pub run: ProvisioningRun,
    pub record: Result<Option<Vec<AccountRecord>>>,
}

impl AccountsSummary {
    /// Records written this run, if any.
    #[must_use]
    pub fn written(&self) -> Option<&[AccountRecord]> {
        self.record.as_ref().ok().and_then(Option::as_deref)
    }

    /// Every failure of the run, one message per failed part.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems: Vec<String> = self
            .run
            .failures()
            .into_iter()
            .map(|(kind, e)| format!("{kind} account: {e}"))
            .collect();
        if let Err(e) = &self.record {
            problems.push(format!("wallets.json: {e:#}"));
        }
        problems
    }
}

/// Provision both accounts, then write the summary record if either changed.
///
/// The record is written even when the other kind failed, so a key created
/// this run is never left out of it.
pub async fn provision_and_record(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    settings: &AccountSettings,
    paths: &RecordPaths,
) -> AccountsSummary {
    let run = provision_accounts(runner, fs, reporter, settings).await;
    let record = provisioning_record::write_if_changed(
        runner,
        fs,
        reporter,
        &settings.keys,
        paths,
        &run.outcomes(),
    )
    .await;
    AccountsSummary { run, record }
}

/// Provision the stake and vote accounts concurrently.
pub async fn provision_accounts(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    settings: &AccountSettings,
) -> ProvisioningRun {
    let (stake, vote) = tokio::join!(
        provision_account(runner, fs, reporter, settings, AccountKind::Stake),
        provision_account(runner, fs, reporter, settings, AccountKind::Vote),
    );
    ProvisioningRun { stake, vote }
}

/// Inspect one account, act on its classification, and confirm.
///
/// A missing live keypair is a vacant slot: it classifies as absent without
/// a query, and a fresh key is generated before creation. This is also how a
/// recovery that stopped after archiving resumes on the next run.
///
/// # Errors
///
/// Returns an [`AccountError`] for unrecognized query errors or for any
/// failed step up to account creation. Completed steps are not rolled back.
/// A failed confirming query is reported in [`AccountReport::confirm_error`]
/// instead, since the account already exists by then.
pub async fn provision_account(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    settings: &AccountSettings,
    kind: AccountKind,
) -> Result<AccountReport> {
    let live = settings.keys.path(kind);

    let vacant = !fs.exists(live);
    let (classification, query_stdout) = if vacant {
        reporter.warn(&format!(
            "{kind} key not found at {}; a new one will be generated",
            live.display()
        ));
        (AccountClassification::Absent, String::new())
    } else {
        inspect(runner, kind, live).await?
    };
    tracing::debug!(%kind, ?classification, vacant, "account classified");

    let outcome = match classification {
        AccountClassification::Correct => {
            reporter.success(&format!("{} account exists", capitalized(kind)));
            return Ok(AccountReport {
                kind,
                outcome: ProvisioningOutcome::Unchanged,
                excerpt: account::excerpt(&query_stdout),
                confirm_error: None,
            });
        }
        AccountClassification::Absent => {
            require_creation_inputs(fs, &settings.keys, kind)?;
            if vacant {
                generate_key(runner, reporter, kind, live).await?;
            }
            create_account(runner, settings, kind).await?;
            reporter.success(&format!("{} account created", capitalized(kind)));
            ProvisioningOutcome::Created
        }
        AccountClassification::WrongType => {
            require_creation_inputs(fs, &settings.keys, kind)?;
            reporter.warn(&format!(
                "{} is not a {kind} account; archiving it and creating a new one",
                live.display()
            ));
            let archived = archive_key(fs, kind, live, &settings.keys.archive_dir, Utc::now())?;
            reporter.step(&format!(
                "Moved {} to archive: {}",
                file_name(kind, live),
                archived.display()
            ));
            generate_key(runner, reporter, kind, live).await?;
            create_account(runner, settings, kind).await?;
            reporter.success(&format!("{} account recreated", capitalized(kind)));
            ProvisioningOutcome::Recreated
        }
    };

    let (excerpt, confirm_error) = match confirm(runner, kind, live).await {
        Ok(excerpt) => (excerpt, None),
        Err(e) => {
            tracing::warn!(%kind, error = %format!("{e:#}"), "created account not confirmed");
            reporter.warn(&format!(
                "{} account was created but could not be confirmed",
                capitalized(kind)
            ));
            (String::new(), Some(format!("{e:#}")))
        }
    };
    Ok(AccountReport {
        kind,
        outcome,
        excerpt,
        confirm_error,
    })
}

/// Vote creation signs with the identity and withdrawer keys, so both must
/// exist before the live vote key is touched.
fn require_creation_inputs(
    fs: &impl LocalFs,
    keys: &KeyPaths,
    kind: AccountKind,
) -> Result<(), AccountError> {
    if kind != AccountKind::Vote {
        return Ok(());
    }
    for input in [AccountKind::Identity, AccountKind::Withdrawer] {
        if !fs.exists(keys.path(input)) {
            return Err(AccountError::MissingKey {
                kind: input,
                path: keys.path(input).to_path_buf(),
            });
        }
    }
    Ok(())
}

async fn inspect(
    runner: &impl CommandRunner,
    kind: AccountKind,
    live: &Path,
) -> Result<(AccountClassification, String)> {
    let output = query(runner, kind, live)
        .await
        .map_err(|e| AccountError::InspectionFailed {
            kind,
            stderr: format!("{e:#}"),
        })?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    let classification = account::classify(kind, output.status.success(), &stderr)?;
    Ok((
        classification,
        String::from_utf8_lossy(&output.stdout).into_owned(),
    ))
}

async fn query(
    runner: &impl CommandRunner,
    kind: AccountKind,
    live: &Path,
) -> Result<std::process::Output> {
    let sub = kind
        .query_subcommand()
        .ok_or_else(|| anyhow::anyhow!("{kind} accounts cannot be queried"))?;
    let path = live.to_string_lossy();
    runner.run(SOLANA_CLI, &[sub, &path]).await
}

/// Move the live key into the archive directory.
///
/// The archive keeps the original file name unless an earlier archive
/// already took it, in which case the name carries a UTC timestamp.
fn archive_key(
    fs: &impl LocalFs,
    kind: AccountKind,
    live: &Path,
    archive_dir: &Path,
    now: DateTime<Utc>,
) -> Result<PathBuf, AccountError> {
    let failed = |path: &Path, e: &anyhow::Error| AccountError::ArchiveFailed {
        kind,
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    };

    if !fs.exists(archive_dir) {
        fs.create_dir_all(archive_dir)
            .map_err(|e| failed(archive_dir, &e))?;
    }
    let name = file_name(kind, live);
    let mut target = archive_dir.join(&name);
    if fs.exists(&target) {
        target = archive_dir.join(timestamped_name(&name, now));
    }
    fs.rename(live, &target).map_err(|e| failed(&target, &e))?;
    tracing::info!(%kind, from = %live.display(), to = %target.display(), "key archived");
    Ok(target)
}

fn timestamped_name(name: &str, now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y%m%dT%H%M%SZ");
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{stamp}.{ext}"),
        None => format!("{name}-{stamp}"),
    }
}

fn file_name(kind: AccountKind, live: &Path) -> String {
    live.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(kind.key_file())
        .to_string()
}

async fn generate_key(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    kind: AccountKind,
    live: &Path,
) -> Result<()> {
    let path = live.to_string_lossy();
    let failed = |stderr: String| AccountError::KeygenFailed {
        kind,
        path: live.to_path_buf(),
        stderr,
    };
    let output = runner
        .run(KEYGEN_CLI, &["new", "--no-passphrase", "-o", &path])
        .await
        .map_err(|e| failed(format!("{e:#}")))?;
    if !output.status.success() {
        return Err(failed(String::from_utf8_lossy(&output.stderr).trim().to_string()).into());
    }
    reporter.step(&format!("Created new {kind} key: {path}"));
    Ok(())
}

async fn create_account(
    runner: &impl CommandRunner,
    settings: &AccountSettings,
    kind: AccountKind,
) -> Result<()> {
    let keys = &settings.keys;
    let live = keys.path(kind).to_string_lossy().into_owned();
    let output = match kind {
        AccountKind::Stake => {
            runner
                .run_with_timeout(
                    SOLANA_CLI,
                    &["create-stake-account", &live, &settings.stake_amount],
                    TRANSACTION_TIMEOUT,
                )
                .await
        }
        AccountKind::Vote => {
            let identity = keys.identity.to_string_lossy();
            let withdrawer = keys.withdrawer.to_string_lossy();
            let commission = settings.commission.to_string();
            runner
                .run_with_timeout(
                    SOLANA_CLI,
                    &[
                        "create-vote-account",
                        &live,
                        &identity,
                        &withdrawer,
                        "--commission",
                        &commission,
                    ],
                    TRANSACTION_TIMEOUT,
                )
                .await
        }
        AccountKind::Identity | AccountKind::Withdrawer => {
            anyhow::bail!("{kind} accounts are not provisioned")
        }
    }
    .map_err(|e| AccountError::CreateFailed {
        kind,
        stderr: format!("{e:#}"),
    })?;

    if !output.status.success() {
        return Err(AccountError::CreateFailed {
            kind,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }
    tracing::info!(%kind, "account created");
    Ok(())
}

async fn confirm(runner: &impl CommandRunner, kind: AccountKind, live: &Path) -> Result<String> {
    let output = query(runner, kind, live)
        .await
        .map_err(|e| AccountError::ConfirmFailed {
            kind,
            stderr: format!("{e:#}"),
        })?;
    if !output.status.success() {
        return Err(AccountError::ConfirmFailed {
            kind,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }
    Ok(account::excerpt(&String::from_utf8_lossy(&output.stdout)))
}

fn capitalized(kind: AccountKind) -> &'static str {
    match kind {
        AccountKind::Identity => "Identity",
        AccountKind::Withdrawer => "Withdrawer",
        AccountKind::Stake => "Stake",
        AccountKind::Vote => "Vote",
    }
}

//! `valctl accounts` — inspect, repair and record the stake and vote accounts.

use std::process::ExitCode;

use anyhow::Result;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::services::account_provisioning::{self, ProvisioningRun};
use crate::domain::{AccountKind, AccountRecord, AccountReport, ProvisioningOutcome};
use crate::output::{TerminalReporter, json};

/// One account kind in `--json` output.
#[derive(Serialize)]
struct AccountEntry<'a> {
    kind: AccountKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<ProvisioningOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    excerpt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct AccountsOutput<'a> {
    accounts: Vec<AccountEntry<'a>>,
    /// Records written this run; absent when nothing changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<&'a [AccountRecord]>,
}

/// Run the accounts command.
///
/// Both kinds are always reported. The summary record is written when either
/// kind changed, even if the other failed; the command then still fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let settings = app.config.account_settings(&app.home);
    let paths = app.config.record_paths(&app.home);
    let reporter = TerminalReporter::new(&app.output);

    let summary =
        account_provisioning::provision_and_record(&app.runner, &app.fs, &reporter, &settings, &paths)
            .await;
    drop(reporter);

    if app.is_json() {
        let output = AccountsOutput {
            accounts: entries(&summary.run),
            record: summary.written(),
        };
        println!("{}", json::format_json(&output)?);
    } else {
        render_human(app, &summary.run);
    }

    let problems = summary.problems();
    if problems.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        anyhow::bail!("{}", problems.join("; "))
    }
}

fn entries(run: &ProvisioningRun) -> Vec<AccountEntry<'_>> {
    [(AccountKind::Stake, &run.stake), (AccountKind::Vote, &run.vote)]
        .into_iter()
        .map(|(kind, result)| match result {
            Ok(report) => AccountEntry {
                kind,
                outcome: Some(report.outcome),
                excerpt: Some(report.excerpt.as_str()).filter(|e| !e.is_empty()),
                error: report.confirm_error.clone(),
            },
            Err(e) => AccountEntry {
                kind,
                outcome: None,
                excerpt: None,
                error: Some(format!("{e:#}")),
            },
        })
        .collect()
}

fn render_human(app: &AppContext, run: &ProvisioningRun) {
    for (kind, result) in [(AccountKind::Stake, &run.stake), (AccountKind::Vote, &run.vote)] {
        match result {
            Ok(report) => render_report(app, report),
            Err(e) => app.output.error(&format!("{kind} account: {e:#}")),
        }
    }
}

fn render_report(app: &AppContext, report: &AccountReport) {
    let outcome = match report.outcome {
        ProvisioningOutcome::Unchanged => "unchanged",
        ProvisioningOutcome::Created => "created",
        ProvisioningOutcome::Recreated => "recreated",
    };
    app.output.header(&format!("{} account ({outcome})", report.kind));
    match &report.confirm_error {
        Some(e) => app.output.error(&format!("{} account not confirmed: {e}", report.kind)),
        None => app.output.block(&report.excerpt),
    }
}

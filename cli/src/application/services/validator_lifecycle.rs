//! Application service — start-or-delegate use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, PortProbe, ProgressReporter};
use crate::domain::validator::{
    SOLANA_CLI, SyncStatus, TRANSACTION_TIMEOUT, classify_catchup,
};
use crate::domain::{LifecycleOutcome, LifecycleState, ValidatorError, ValidatorSettings};

/// Whether a validator is serving on the RPC port.
///
/// # Errors
///
/// Returns an error if the probe itself cannot run.
pub async fn check_running(probe: &impl PortProbe, port: u16) -> Result<bool> {
    probe
        .is_listening(port)
        .await
        .with_context(|| format!("checking port {port}"))
}

/// Ensure the validator runs, wait for catch-up, then delegate stake.
///
/// An already running validator is delegated immediately. Otherwise the
/// validator is launched detached and the RPC port is polled within the
/// configured budget before the catch-up check decides whether to delegate.
///
/// # Errors
///
/// Returns a [`ValidatorError`] for launch failure, startup timeout, a failed
/// catch-up command or a failed delegation. Not being caught up is reported
/// as [`LifecycleOutcome::NotCaughtUp`], not as an error.
pub async fn activate(
    runner: &impl CommandRunner,
    probe: &impl PortProbe,
    reporter: &impl ProgressReporter,
    settings: &ValidatorSettings,
) -> Result<LifecycleOutcome> {
    let port = settings.launch.rpc_port;
    let mut state = LifecycleState::Unknown;

    if check_running(probe, port).await? {
        transition(&mut state, LifecycleState::Running);
        reporter.step(&format!(
            "Validator is already running on port {port}. Proceeding to delegate stake..."
        ));
        let output = delegate_stake(runner, reporter, settings).await?;
        transition(&mut state, LifecycleState::Delegated);
        return Ok(LifecycleOutcome::Delegated { output });
    }

    transition(&mut state, LifecycleState::NotRunning);
    reporter.step("Validator is not currently running. Starting it now...");
    launch(runner, settings)?;
    transition(&mut state, LifecycleState::Starting);
    reporter.success("Validator start command issued.");

    wait_for_port(probe, reporter, settings, &mut state).await?;
    reporter.success(&format!(
        "Validator started successfully and is running on port {port}."
    ));

    stabilize(reporter, settings.stabilization).await;

    reporter.step("Running catchup command...");
    let output = run_catchup(runner).await?;
    reporter.detail(output.trim_end());

    match classify_catchup(&output) {
        SyncStatus::CaughtUp => {
            transition(&mut state, LifecycleState::Synced);
            reporter.step("Validator caught up, delegating stake...");
            let output = delegate_stake(runner, reporter, settings).await?;
            transition(&mut state, LifecycleState::Delegated);
            Ok(LifecycleOutcome::Delegated { output })
        }
        SyncStatus::NotCaughtUp => {
            reporter.warn(
                "Validator did not catch up. No stake delegation attempted. Check logs for fatal errors",
            );
            Ok(LifecycleOutcome::NotCaughtUp { output })
        }
    }
}

fn transition(state: &mut LifecycleState, next: LifecycleState) {
    tracing::debug!(from = %state, to = %next, "validator lifecycle transition");
    *state = next;
}

fn launch(runner: &impl CommandRunner, settings: &ValidatorSettings) -> Result<u32> {
    let args = settings.launch.args();
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let pid = runner
        .spawn_detached(&settings.binary, &arg_refs, &settings.dir)
        .map_err(|e| ValidatorError::LaunchFailed(format!("{e:#}")))?;
    tracing::info!(pid, dir = %settings.dir.display(), "validator launched");
    Ok(pid)
}

/// Poll the RPC port, waiting `poll_interval` before every check.
async fn wait_for_port(
    probe: &impl PortProbe,
    reporter: &impl ProgressReporter,
    settings: &ValidatorSettings,
    state: &mut LifecycleState,
) -> Result<u32> {
    let port = settings.launch.rpc_port;
    reporter.step(&format!("Waiting for the validator to open port {port}..."));
    for attempt in 1..=settings.poll_attempts {
        tokio::time::sleep(settings.poll_interval).await;
        transition(state, LifecycleState::Polling { attempt });
        // A probe that cannot run counts as a negative check.
        let listening = match check_running(probe, port).await {
            Ok(listening) => listening,
            Err(e) => {
                tracing::warn!(attempt, error = %format!("{e:#}"), "port check failed");
                false
            }
        };
        if listening {
            return Ok(attempt);
        }
        reporter.update(&format!("Check {attempt}: Validator not yet running..."));
    }
    Err(ValidatorError::StartupTimeout {
        attempts: settings.poll_attempts,
        port,
    }
    .into())
}

/// Hold for the stabilization window, counting down once per second.
async fn stabilize(reporter: &impl ProgressReporter, window: Duration) {
    let secs = window.as_secs();
    if secs == 0 {
        return;
    }
    reporter.step(&format!(
        "Waiting for {secs} seconds for the validator to stabilize..."
    ));
    for remaining in (1..=secs).rev() {
        reporter.update(&format!(
            "Waiting for {remaining} seconds for the validator to stabilize..."
        ));
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

async fn run_catchup(runner: &impl CommandRunner) -> Result<String> {
    let output = runner
        .run_to_completion(SOLANA_CLI, &["catchup", "--our-localhost"])
        .await
        .map_err(|e| ValidatorError::CatchupFailed {
            stderr: format!("{e:#}"),
        })?;
    if !output.status.success() {
        return Err(ValidatorError::CatchupFailed {
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

async fn delegate_stake(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    settings: &ValidatorSettings,
) -> Result<String> {
    let stake = settings.stake_keypair().to_string_lossy().into_owned();
    let vote = settings.vote_keypair().to_string_lossy().into_owned();
    let output = runner
        .run_with_timeout(
            SOLANA_CLI,
            &["delegate-stake", &stake, &vote],
            TRANSACTION_TIMEOUT,
        )
        .await
        .map_err(|e| ValidatorError::DelegationFailed {
            stderr: format!("{e:#}"),
        })?;
    if !output.status.success() {
        return Err(ValidatorError::DelegationFailed {
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    reporter.detail(stdout.trim_end());
    reporter.success("Delegation successful, a restart is required.");
    Ok(stdout)
}

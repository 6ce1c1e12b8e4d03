//! `valctl activate` — start the validator if needed, then delegate stake.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::validator_lifecycle;
use crate::domain::LifecycleOutcome;
use crate::infra::port_probe::LsofPortProbe;
use crate::output::TerminalReporter;

/// Run the activate command.
///
/// A node that never reports being caught up is not an error: the operator
/// is pointed at the logs and the command still exits successfully.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let settings = app.config.validator_settings(&app.home);
    let probe = LsofPortProbe::new(&app.runner);
    let reporter = TerminalReporter::new(&app.output);

    let outcome = validator_lifecycle::activate(&app.runner, &probe, &reporter, &settings).await?;
    drop(reporter);

    match outcome {
        LifecycleOutcome::Delegated { .. } => {
            app.output
                .info("Restart the validator so it votes with the delegated stake.");
        }
        LifecycleOutcome::NotCaughtUp { .. } => {
            app.output.info(&format!(
                "Check {} for fatal errors, then run `valctl activate` again.",
                settings.launch.log_path.display()
            ));
        }
    }
    Ok(ExitCode::SUCCESS)
}

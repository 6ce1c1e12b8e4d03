//! `valctl status` — read-only view of the validator port and key addresses.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::status::{StatusReport, gather_status};
use crate::infra::port_probe::LsofPortProbe;
use crate::output::json;

/// Run the status command.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let keys = app.config.account_settings(&app.home).keys;
    let probe = LsofPortProbe::new(&app.runner);
    let report = gather_status(&app.runner, &probe, app.config.validator.rpc_port, &keys).await;

    if app.is_json() {
        println!("{}", json::format_json(&report)?);
    } else {
        render(app, &report);
    }
    Ok(ExitCode::SUCCESS)
}

fn render(app: &AppContext, report: &StatusReport) {
    app.output.header("Validator");
    let state = match report.running {
        Some(true) => format!("running (port {} bound)", report.rpc_port),
        Some(false) => format!("not running (port {} free)", report.rpc_port),
        None => "unknown".to_string(),
    };
    app.output.kv("status", &state);

    app.output.header("Keys");
    for key in &report.keys {
        let label = format!("{:<10}", key.name.to_string());
        app.output
            .kv(&label, key.address.as_deref().unwrap_or("unavailable"));
    }
}

//! Application service — read-only validator status gathering.
//!
//! Nothing here mutates wallet or filesystem state. All errors are swallowed
//! and reflected as absent optional fields.

use serde::Serialize;

use crate::application::ports::{CommandRunner, PortProbe};
use crate::application::services::provisioning_record::lookup_address;
use crate::domain::{AccountKind, KeyPaths};

/// Address of one key, when it could be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyStatus {
    pub name: AccountKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Snapshot of the validator and its keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub rpc_port: u16,
    /// `None` when the port could not be probed.
    pub running: Option<bool>,
    pub keys: Vec<KeyStatus>,
}

/// Probe the RPC port and resolve the four key addresses.
pub async fn gather_status(
    runner: &impl CommandRunner,
    probe: &impl PortProbe,
    rpc_port: u16,
    keys: &KeyPaths,
) -> StatusReport {
    let running = match probe.is_listening(rpc_port).await {
        Ok(listening) => Some(listening),
        Err(e) => {
            tracing::warn!(port = rpc_port, error = %format!("{e:#}"), "port probe failed");
            None
        }
    };

    let mut statuses = Vec::with_capacity(AccountKind::RECORD_ORDER.len());
    for kind in AccountKind::RECORD_ORDER {
        let address = match lookup_address(runner, kind, keys.path(kind)).await {
            Ok(address) => Some(address),
            Err(e) => {
                tracing::debug!(%kind, error = %format!("{e:#}"), "address unavailable");
                None
            }
        };
        statuses.push(KeyStatus {
            name: kind,
            address,
        });
    }

    StatusReport {
        rpc_port,
        running,
        keys: statuses,
    }
}

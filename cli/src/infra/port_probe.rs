//! Port probe infrastructure — implements `PortProbe`.
//!
//! Asks `lsof` whether anything is bound to the port, the way an operator
//! would check by hand. Hosts without `lsof` fall back to a loopback TCP
//! connect through `spawn_blocking`.

use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, PortProbe};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Production probe over a `CommandRunner`.
pub struct LsofPortProbe<'a, R> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> LsofPortProbe<'a, R> {
    #[must_use]
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> PortProbe for LsofPortProbe<'_, R> {
    async fn is_listening(&self, port: u16) -> Result<bool> {
        let target = format!(":{port}");
        match self.runner.run("lsof", &["-i", &target]).await {
            // lsof exits 1 with empty output when nothing matches.
            Ok(output) => Ok(!output.stdout.is_empty()),
            Err(e) => {
                tracing::debug!(error = %format!("{e:#}"), "lsof unavailable, using tcp connect");
                tcp_connect(port).await
            }
        }
    }
}

async fn tcp_connect(port: u16) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
        std::net::TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).is_ok()
    })
    .await
    .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))
}

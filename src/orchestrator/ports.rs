use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

use crate::config::model::Profile;
use crate::error::FednodeError;

/// Per-port connect timeout for the install preflight.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConflict {
    pub port: u16,
    pub owner: Option<String>,
}

impl std::fmt::Display for PortConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "Port {} is already in use by {}", self.port, owner),
            None => write!(f, "Port {} is already in use", self.port),
        }
    }
}

/// Decides whether a host port is already taken.
#[allow(async_fn_in_trait)]
pub trait PortProbe {
    async fn in_use(&self, port: u16) -> bool;
}

/// Probes by attempting a TCP connect to localhost; a successful connect
/// means something is listening.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    pub timeout: Duration,
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl PortProbe for TcpProbe {
    async fn in_use(&self, port: u16) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(("127.0.0.1", port))).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!(port, error = %e, "port probe refused");
                false
            }
            Err(_) => {
                debug!(port, "port probe timed out");
                false
            }
        }
    }
}

/// Identify which process owns a given port.
pub fn identify_port_owner(port: u16) -> Option<String> {
    crate::platform::identify_port_owner(port)
}

/// Probe every port in order and collect the ones already bound.
pub async fn check_ports<P: PortProbe>(probe: &P, ports: &[u16]) -> Vec<PortConflict> {
    let mut conflicts = Vec::new();
    for &port in ports {
        if probe.in_use(port).await {
            conflicts.push(PortConflict {
                port,
                owner: identify_port_owner(port),
            });
        }
    }
    conflicts
}

/// Fail if any port reserved by `profile` is already bound on the host.
pub async fn check_ports_free<P: PortProbe>(probe: &P, profile: Profile) -> Result<(), FednodeError> {
    let conflicts = check_ports(probe, &profile.reserved_ports()).await;
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(FednodeError::PortsInUse { conflicts })
    }
}

use super::{PortBinding, Privilege, ServiceState, TunnelStatus};
use anyhow::Result;
use std::fmt::Debug;

/// Trait for the container orchestration tool (docker compose or
/// compatible). Launching is fire-and-forget; state queries scrape the
/// tool's `ps` listing behind the adapter.
pub trait ComposeRuntime: Send + Sync + Debug {
    /// Bring the whole stack up, detached.
    fn start_all(&self) -> Result<()>;

    /// Tear the stack down.
    fn stop_all(&self) -> Result<()>;

    /// Best-effort run state of a named service. Absence of a match is
    /// `Down`, never an error.
    fn query_state(&self, service: &str) -> Result<ServiceState>;
}

/// Trait for the tunnel client (tailscale or compatible).
pub trait TunnelClient: Send + Sync + Debug {
    /// Bind a public tunnel to `port`, backgrounded. Returns once the
    /// command exits, not once the tunnel has converged.
    fn activate(&self, port: u16, privilege: Privilege) -> Result<()>;

    /// Drop the tunnel configuration.
    fn deactivate(&self, privilege: Privilege) -> Result<()>;

    /// Live status report. Never cached.
    fn status(&self) -> Result<TunnelStatus>;
}

/// Trait for inspecting the host's listening-socket table.
pub trait SocketInspector: Send + Sync + Debug {
    fn check_listening(&self, port: u16, privilege: Privilege) -> Result<PortBinding>;
}

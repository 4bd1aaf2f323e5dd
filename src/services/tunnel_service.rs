use crate::domain::{Privilege, TunnelClient, TunnelStatus};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Wrapper over the tunnel client: activation, capability verification and
/// public-hostname extraction.
pub struct TunnelService {
    client: Arc<dyn TunnelClient>,
}

impl TunnelService {
    pub fn new(client: Arc<dyn TunnelClient>) -> Self {
        Self { client }
    }

    pub fn activate(&self, port: u16, privilege: Privilege) -> Result<()> {
        info!("🌐 Binding funnel to port {port} (backgrounded)...");
        self.client.activate(port, privilege)
    }

    pub fn deactivate(&self, privilege: Privilege) -> Result<()> {
        info!("🌐 Resetting funnel...");
        self.client.deactivate(privilege)
    }

    /// Re-fetches the live status and reports whether the funnel capability
    /// is asserted. The tool's own state may lag activation, so the caller
    /// treats `false` as a warning, not a failure.
    pub fn verify_enabled(&self) -> Result<bool> {
        let status = self.client.status()?;

        if !status.funnel_enabled {
            warn!("Funnel capability not asserted in tunnel status");
        }

        Ok(status.funnel_enabled)
    }

    /// The node's self-identified public hostname, with the DNS root dot
    /// stripped. None when the status report carries no usable name.
    pub fn public_hostname(&self) -> Result<Option<String>> {
        let status = self.client.status()?;
        Ok(status.self_dns_name.as_deref().map(strip_root_dot))
    }

    pub fn status(&self) -> Result<TunnelStatus> {
        self.client.status()
    }
}

fn strip_root_dot(dns_name: &str) -> String {
    dns_name.strip_suffix('.').unwrap_or(dns_name).to_string()
}

use crate::domain::{
    PortBinding, Privilege, RunReport, ServiceDescriptor, ServiceState, SocketInspector,
    TunnelStatus,
};
use crate::services::{ReadinessProber, StackService, TunnelService};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Drives the deploy sequence: launch, readiness, funnel activation,
/// funnel verification, socket verification, outcome.
///
/// Control flows strictly forward. Launch and readiness failures abort the
/// run; every later check degrades to a warning on the report.
pub struct Orchestrator {
    stack: Arc<StackService>,
    prober: ReadinessProber,
    tunnel: Arc<TunnelService>,
    sockets: Arc<dyn SocketInspector>,
}

/// One-shot snapshot of the deployment's observable state.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub service_state: ServiceState,
    pub tunnel: TunnelStatus,
    pub binding: PortBinding,
}

impl Orchestrator {
    pub fn new(
        stack: Arc<StackService>,
        prober: ReadinessProber,
        tunnel: Arc<TunnelService>,
        sockets: Arc<dyn SocketInspector>,
    ) -> Self {
        Self {
            stack,
            prober,
            tunnel,
            sockets,
        }
    }

    /// Runs the full sequence for `descriptor`. An Err here is the fatal
    /// path (launch or readiness); an Ok report may still carry warnings.
    pub fn deploy(
        &self,
        descriptor: &ServiceDescriptor,
        privilege: Privilege,
    ) -> Result<RunReport> {
        let mut report = RunReport::new();

        // Stage 1: launch. The only hard abort besides readiness.
        self.stack.start_all()?;

        // Stage 2: readiness gate.
        self.prober.wait_until_ready(&descriptor.name)?;

        // Stage 3: funnel activation, backgrounded.
        self.tunnel.activate(descriptor.port, privilege)?;

        // Stage 4: capability flag. The tool's state may lag the query.
        if !self.tunnel.verify_enabled()? {
            report.warn("funnel might not be active");
        }

        // Stage 5: listening socket. May race slow-starting listeners.
        let binding = self.sockets.check_listening(descriptor.port, privilege)?;
        if !binding.listening {
            warn!("Port {} not observed in LISTEN state", descriptor.port);
            report.warn(format!(
                "port {} is not listening; the service might not be running correctly",
                descriptor.port
            ));
        }

        // Stage 6: outcome. Status is re-fetched, never reused from stage 4.
        match self.tunnel.public_hostname()? {
            Some(host) => {
                report.public_url = Some(format!("https://{host}/"));
            }
            None => {
                report.warn("public hostname missing from tunnel status; no URL available");
            }
        }

        Ok(report)
    }

    /// Best-effort teardown: compose down, then funnel reset. Each step
    /// warns and continues on failure.
    pub fn teardown(&self, privilege: Privilege) -> Result<()> {
        if let Err(e) = self.stack.stop_all() {
            error!("Failed to stop the compose stack: {e}");
        }

        if let Err(e) = self.tunnel.deactivate(privilege) {
            error!("Failed to reset the funnel: {e}");
        }

        info!("✅ Teardown finished");
        Ok(())
    }

    pub fn status_snapshot(
        &self,
        descriptor: &ServiceDescriptor,
        privilege: Privilege,
    ) -> Result<StatusSnapshot> {
        Ok(StatusSnapshot {
            service_state: self.stack.query_state(&descriptor.name)?,
            tunnel: self.tunnel.status()?,
            binding: self.sockets.check_listening(descriptor.port, privilege)?,
        })
    }
}

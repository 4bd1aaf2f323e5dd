use crate::domain::{ComposeRuntime, ServiceState};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Thin wrapper over the compose runtime with user-facing logging.
pub struct StackService {
    runtime: Arc<dyn ComposeRuntime>,
}

impl StackService {
    pub fn new(runtime: Arc<dyn ComposeRuntime>) -> Self {
        Self { runtime }
    }

    pub fn start_all(&self) -> Result<()> {
        info!("🚀 Bringing the compose stack up...");
        self.runtime.start_all()
    }

    pub fn stop_all(&self) -> Result<()> {
        info!("💤 Taking the compose stack down...");
        self.runtime.stop_all()
    }

    pub fn query_state(&self, service: &str) -> Result<ServiceState> {
        let state = self.runtime.query_state(service)?;

        if state != ServiceState::Up {
            warn!("Service {service} is not reporting Up");
        }

        Ok(state)
    }
}

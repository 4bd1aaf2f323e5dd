pub mod cli;
pub mod config;
pub mod domain;
pub mod infra;
pub mod services;

// Make test_support available for integration tests
// In a real production crate, we might use a feature flag "test-utils"
pub mod test_support;

pub use config::DeployConfig;
pub use domain::{
    ComposeRuntime, PortBinding, Privilege, RunReport, ServiceDescriptor, ServiceState,
    SocketInspector, TunnelClient, TunnelStatus,
};
pub use infra::{ComposeAdapter, SocketTableAdapter, TailscaleAdapter};
pub use services::{Orchestrator, ReadinessProber, StackService, TunnelService};

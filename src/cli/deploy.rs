use crate::config::{DeployConfig, load_config};
use crate::domain::{
    ComposeRuntime, Privilege, ServiceDescriptor, ServiceState, SocketInspector, TunnelClient,
};
use crate::infra::{ComposeAdapter, SocketTableAdapter, TailscaleAdapter};
use crate::services::{Orchestrator, ReadinessProber, StackService, TunnelService};
use anyhow::Result;
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Flag-level overrides layered on top of `tunnelup.toml`.
#[derive(Args, Debug, Default, Clone)]
pub struct DeployOverrides {
    /// Compose service whose readiness gates the run
    #[arg(long)]
    pub service: Option<String>,

    /// Port the funnel binds and the socket check inspects
    #[arg(long)]
    pub port: Option<u16>,

    /// Compose file passed to docker compose with -f
    #[arg(long)]
    pub compose_file: Option<String>,

    /// Readiness deadline in seconds
    #[arg(long)]
    pub wait: Option<u64>,

    /// Run tailscale and ss as the current user instead of via sudo
    #[arg(long)]
    pub no_sudo: bool,
}

impl DeployOverrides {
    fn apply(self, mut config: DeployConfig) -> DeployConfig {
        if let Some(service) = self.service {
            config.service = service;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(compose_file) = self.compose_file {
            config.compose_file = Some(compose_file);
        }
        if let Some(wait) = self.wait {
            config.readiness_wait_secs = wait;
        }
        if self.no_sudo {
            config.sudo = false;
        }
        config
    }
}

/// Wires configuration, adapters and services for one invocation.
pub struct Deployment {
    descriptor: ServiceDescriptor,
    privilege: Privilege,
    orchestrator: Orchestrator,
}

impl Deployment {
    pub fn new(config_dir: &Path, overrides: DeployOverrides) -> Result<Self> {
        let config = overrides.apply(load_config(config_dir)?);

        let compose: Arc<dyn ComposeRuntime> =
            Arc::new(ComposeAdapter::new(config.compose_file_path()));
        let tunnel: Arc<dyn TunnelClient> = Arc::new(TailscaleAdapter::new());
        let sockets: Arc<dyn SocketInspector> = Arc::new(SocketTableAdapter::new());

        Ok(Self::with_hosts(config, compose, tunnel, sockets))
    }

    /// Test seam: build the same wiring over injected collaborators.
    pub fn with_hosts(
        config: DeployConfig,
        compose: Arc<dyn ComposeRuntime>,
        tunnel: Arc<dyn TunnelClient>,
        sockets: Arc<dyn SocketInspector>,
    ) -> Self {
        let descriptor = ServiceDescriptor::new(config.service.clone(), config.port);
        let privilege = Privilege::from_sudo_flag(config.sudo);

        let stack = Arc::new(StackService::new(compose.clone()));
        let prober = ReadinessProber::new(
            compose,
            Duration::from_secs(config.readiness_wait_secs),
            Duration::from_secs(config.poll_interval_secs),
        );
        let tunnel_service = Arc::new(TunnelService::new(tunnel));

        Self {
            descriptor,
            privilege,
            orchestrator: Orchestrator::new(stack, prober, tunnel_service, sockets),
        }
    }

    /// The core sequence: returns Err (non-zero exit) only on launch or
    /// readiness failure; warnings print but keep the exit code at zero.
    pub fn up(&self) -> Result<()> {
        let report = self.orchestrator.deploy(&self.descriptor, self.privilege)?;

        println!();
        match &report.public_url {
            Some(url) => println!("🎉 Your service is publicly reachable at {url}"),
            None => println!("🚧 Deployed, but no public URL could be derived"),
        }

        for warning in &report.warnings {
            println!("⚠️  {warning}");
        }

        println!();
        println!("To tear down:  tunnelup down");
        println!(
            "To view logs:  docker compose logs {}",
            self.descriptor.name
        );

        Ok(())
    }

    pub fn down(&self) -> Result<()> {
        self.orchestrator.teardown(self.privilege)
    }

    pub fn status(&self) -> Result<()> {
        let snapshot = self
            .orchestrator
            .status_snapshot(&self.descriptor, self.privilege)?;

        let state = match snapshot.service_state {
            ServiceState::Up => "up",
            ServiceState::Down => "down",
            ServiceState::Unknown => "unknown",
        };

        println!("📦 Service {:<12} | {}", self.descriptor.name, state);
        println!(
            "🌐 Funnel              | {}",
            if snapshot.tunnel.funnel_enabled {
                "enabled"
            } else {
                "not asserted"
            }
        );
        println!(
            "🔈 Port {:<12} | {}",
            self.descriptor.port,
            if snapshot.binding.listening {
                "listening"
            } else {
                "not listening"
            }
        );

        match snapshot.tunnel.self_dns_name {
            Some(name) => println!("🏷  Hostname            | {name}"),
            None => println!("🏷  Hostname            | (none reported)"),
        }

        Ok(())
    }
}

use crate::domain::{
    ComposeRuntime, PortBinding, Privilege, ServiceState, SocketInspector, TunnelClient,
    TunnelStatus,
};
use anyhow::{Result, bail};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// In-memory stand-in for all three host collaborators (compose runtime,
/// tunnel client, socket table). Records every call so tests can assert on
/// ordering and coverage, and can be told to fail a single operation.
#[derive(Debug)]
pub struct MockHost {
    services: RwLock<HashMap<String, ServiceState>>,
    funnel_enabled: RwLock<bool>,
    dns_name: RwLock<Option<String>>,
    listening: RwLock<HashSet<u16>>,
    commands: RwLock<Vec<String>>,
    fail_on: RwLock<Option<String>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            funnel_enabled: RwLock::new(false),
            dns_name: RwLock::new(None),
            listening: RwLock::new(HashSet::new()),
            commands: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
        }
    }

    pub fn set_service_state(&self, name: &str, state: ServiceState) {
        self.services
            .write()
            .unwrap()
            .insert(name.to_string(), state);
    }

    pub fn set_funnel_enabled(&self, enabled: bool) {
        *self.funnel_enabled.write().unwrap() = enabled;
    }

    pub fn set_dns_name(&self, name: Option<&str>) {
        *self.dns_name.write().unwrap() = name.map(str::to_string);
    }

    pub fn set_listening(&self, port: u16) {
        self.listening.write().unwrap().insert(port);
    }

    pub fn set_fail_on(&self, operation: &str) {
        *self.fail_on.write().unwrap() = Some(operation.to_string());
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    fn check_fail(&self, operation: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap()
            && fail_on == operation
        {
            bail!("Mock failure on: {}", operation);
        }
        Ok(())
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

fn privilege_tag(privilege: Privilege) -> &'static str {
    match privilege {
        Privilege::Sudo => "sudo",
        Privilege::Current => "user",
    }
}

impl ComposeRuntime for MockHost {
    fn start_all(&self) -> Result<()> {
        self.record_command("compose:up");
        self.check_fail("compose_up")?;

        // State transitions stay under test control; launch has no payload.
        Ok(())
    }

    fn stop_all(&self) -> Result<()> {
        self.record_command("compose:down");
        self.check_fail("compose_down")?;

        let mut services = self.services.write().unwrap();
        for state in services.values_mut() {
            *state = ServiceState::Down;
        }
        Ok(())
    }

    fn query_state(&self, service: &str) -> Result<ServiceState> {
        self.record_command(&format!("compose:ps:{}", service));
        self.check_fail("compose_ps")?;

        Ok(self
            .services
            .read()
            .unwrap()
            .get(service)
            .copied()
            .unwrap_or(ServiceState::Down))
    }
}

impl TunnelClient for MockHost {
    fn activate(&self, port: u16, privilege: Privilege) -> Result<()> {
        self.record_command(&format!("funnel:{}:{}", port, privilege_tag(privilege)));
        self.check_fail("funnel")?;
        Ok(())
    }

    fn deactivate(&self, privilege: Privilege) -> Result<()> {
        self.record_command(&format!("funnel:reset:{}", privilege_tag(privilege)));
        self.check_fail("funnel_reset")?;

        *self.funnel_enabled.write().unwrap() = false;
        Ok(())
    }

    fn status(&self) -> Result<TunnelStatus> {
        self.record_command("tunnel:status");
        self.check_fail("tunnel_status")?;

        Ok(TunnelStatus {
            funnel_enabled: *self.funnel_enabled.read().unwrap(),
            self_dns_name: self.dns_name.read().unwrap().clone(),
        })
    }
}

impl SocketInspector for MockHost {
    fn check_listening(&self, port: u16, privilege: Privilege) -> Result<PortBinding> {
        self.record_command(&format!("ss:{}:{}", port, privilege_tag(privilege)));
        self.check_fail("ss")?;

        Ok(PortBinding {
            port,
            listening: self.listening.read().unwrap().contains(&port),
        })
    }
}

/// Run state of a compose service, derived from the `ps` listing.
///
/// The state is a best-effort textual signal, not a machine-readable
/// contract: anything we cannot positively match as running is `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Unknown,
    Up,
    Down,
}

/// The one service + port pair this run validates. Immutable for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: String,
    pub port: u16,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }
}

/// Snapshot of the tunnel client's status report.
///
/// Fetched live on every query; the activation-time check and the final
/// hostname extraction deliberately do not share a cached value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TunnelStatus {
    pub funnel_enabled: bool,
    pub self_dns_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBinding {
    pub port: u16,
    pub listening: bool,
}

/// Whether privileged host commands run under sudo or as the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Current,
    Sudo,
}

impl Privilege {
    pub fn from_sudo_flag(sudo: bool) -> Self {
        if sudo { Self::Sudo } else { Self::Current }
    }
}

/// Final result of a deploy run: the public URL (when the tunnel reported a
/// hostname) plus every warning accumulated by the non-fatal stages.
///
/// A report with warnings is still a successful run; only the launch and
/// readiness stages can fail the process.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub public_url: Option<String>,
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

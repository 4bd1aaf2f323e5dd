use crate::domain::{PortBinding, Privilege, SocketInspector};
use anyhow::{Context, Result};
use std::process::{Command, Stdio};

/// Adapter over `ss` for inspecting the host's listening-socket table.
#[derive(Debug)]
pub struct SocketTableAdapter;

impl SocketTableAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SocketTableAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketInspector for SocketTableAdapter {
    fn check_listening(&self, port: u16, privilege: Privilege) -> Result<PortBinding> {
        let mut cmd = match privilege {
            Privilege::Sudo => {
                let mut cmd = Command::new("sudo");
                cmd.arg("ss");
                cmd
            }
            Privilege::Current => Command::new("ss"),
        };

        let output = cmd
            .args(["-ltn"])
            .stdout(Stdio::piped())
            .output()
            .with_context(|| format!("scanning socket table for port {port}"))?;

        // A failed scan is treated as "not observed listening": this check
        // is a diagnostic signal, never an abort path.
        if !output.status.success() {
            return Ok(PortBinding {
                port,
                listening: false,
            });
        }

        let table = String::from_utf8_lossy(&output.stdout);
        Ok(PortBinding {
            port,
            listening: parse_listening(&table, port),
        })
    }
}

/// Scans an `ss -ltn` table for a LISTEN row whose local address is bound
/// to `port`.
pub fn parse_listening(table: &str, port: u16) -> bool {
    let suffix = format!(":{port}");

    table.lines().any(|line| {
        let mut words = line.split_whitespace();
        if words.next() != Some("LISTEN") {
            return false;
        }

        // State Recv-Q Send-Q Local-Address:Port Peer-Address:Port
        words
            .nth(2)
            .is_some_and(|local| local.ends_with(&suffix))
    })
}

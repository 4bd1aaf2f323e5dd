use crate::domain::{Privilege, TunnelClient, TunnelStatus};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::process::{Command, Stdio};

/// Adapter over the `tailscale` command line (funnel + status).
#[derive(Debug)]
pub struct TailscaleAdapter;

impl TailscaleAdapter {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, args: &[&str], privilege: Privilege, context: &str) -> Result<()> {
        let status = command_for(privilege, args)
            .status()
            .with_context(|| context.to_string())?;

        if !status.success() {
            bail!("tailscale exited with status {:?} ({context})", status);
        }

        Ok(())
    }
}

impl Default for TailscaleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TunnelClient for TailscaleAdapter {
    fn activate(&self, port: u16, privilege: Privilege) -> Result<()> {
        let port = port.to_string();
        self.run(
            &["funnel", "--bg", port.as_str()],
            privilege,
            &format!("binding funnel to port {port}"),
        )
    }

    fn deactivate(&self, privilege: Privilege) -> Result<()> {
        self.run(&["funnel", "reset"], privilege, "resetting funnel")
    }

    fn status(&self) -> Result<TunnelStatus> {
        let output = Command::new("tailscale")
            .args(["status", "--json"])
            .stdout(Stdio::piped())
            .output()
            .context("querying tailscale status")?;

        if !output.status.success() {
            bail!(
                "tailscale status exited with status {:?}",
                output.status
            );
        }

        parse_status(&String::from_utf8_lossy(&output.stdout))
    }
}

fn command_for(privilege: Privilege, args: &[&str]) -> Command {
    match privilege {
        Privilege::Sudo => {
            let mut cmd = Command::new("sudo");
            cmd.arg("tailscale").args(args);
            cmd
        }
        Privilege::Current => {
            let mut cmd = Command::new("tailscale");
            cmd.args(args);
            cmd
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusReport {
    #[serde(rename = "Funnel", default)]
    funnel: Option<bool>,
    #[serde(rename = "Self", default)]
    self_node: Option<SelfNode>,
}

#[derive(Debug, Deserialize)]
struct SelfNode {
    #[serde(rename = "DNSName", default)]
    dns_name: Option<String>,
}

/// Parses `tailscale status --json`. Only the funnel flag and the node's
/// own DNS name are read; everything else in the report is ignored, and
/// both fields are tolerated absent.
pub fn parse_status(raw: &str) -> Result<TunnelStatus> {
    let report: StatusReport =
        serde_json::from_str(raw).context("parsing tailscale status report")?;

    let self_dns_name = report
        .self_node
        .and_then(|node| node.dns_name)
        .filter(|name| !name.is_empty());

    Ok(TunnelStatus {
        funnel_enabled: report.funnel.unwrap_or(false),
        self_dns_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_funnel_and_dns_name() {
        let raw = r#"{
            "Version": "1.72.0",
            "Funnel": true,
            "Self": {
                "HostName": "muchnic",
                "DNSName": "host.example.ts.net."
            }
        }"#;

        let status = parse_status(raw).unwrap();
        assert!(status.funnel_enabled);
        assert_eq!(
            status.self_dns_name.as_deref(),
            Some("host.example.ts.net.")
        );
    }

    #[test]
    fn absent_funnel_field_reads_false() {
        let raw = r#"{"Self": {"DNSName": "host.example.ts.net."}}"#;

        let status = parse_status(raw).unwrap();
        assert!(!status.funnel_enabled);
    }

    #[test]
    fn funnel_false_reads_false() {
        let raw = r#"{"Funnel": false, "Self": {"DNSName": "x.ts.net."}}"#;
        assert!(!parse_status(raw).unwrap().funnel_enabled);
    }

    #[test]
    fn missing_self_node_yields_no_dns_name() {
        let raw = r#"{"Funnel": true}"#;
        assert_eq!(parse_status(raw).unwrap().self_dns_name, None);
    }

    #[test]
    fn empty_dns_name_yields_none() {
        let raw = r#"{"Self": {"DNSName": ""}}"#;
        assert_eq!(parse_status(raw).unwrap().self_dns_name, None);
    }

    #[test]
    fn malformed_report_is_an_error() {
        assert!(parse_status("not json").is_err());
    }
}

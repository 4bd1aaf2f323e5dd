use crate::config::config_path;
use anyhow::Result;
use std::path::Path;
use std::process::{Command, Stdio};

/// Checks that the external tools this orchestrator shells out to are on
/// PATH, and whether a config file is present.
pub fn run(config_dir: &Path) -> Result<()> {
    println!("🔍 Checking external tools...");

    for tool in ["docker", "tailscale", "ss", "sudo"] {
        if command_available(tool) {
            println!("✅ {tool} available");
        } else {
            println!("⚠️  {tool} not found on PATH");
        }
    }

    let path = config_path(config_dir);
    if path.exists() {
        println!("✅ Config file: {:?}", path);
    } else {
        println!("ℹ️  No config file at {:?}; defaults apply", path);
    }

    Ok(())
}

fn command_available(cmd: &str) -> bool {
    Command::new(cmd)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

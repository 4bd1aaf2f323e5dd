use crate::domain::{ComposeRuntime, ServiceState};
use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

/// Adapter over the `docker compose` command line.
#[derive(Debug)]
pub struct ComposeAdapter {
    compose_file: Option<PathBuf>,
}

impl ComposeAdapter {
    pub fn new(compose_file: Option<PathBuf>) -> Self {
        Self { compose_file }
    }

    fn base_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["compose".into()];
        if let Some(file) = &self.compose_file {
            args.push("-f".into());
            args.push(file.as_os_str().to_os_string());
        }
        args
    }

    fn compose(&self, subcommand: &[&str], context: &str) -> Result<()> {
        let status = self.compose_status(subcommand, context)?;
        ensure_success(status, context)
    }

    fn compose_status(&self, subcommand: &[&str], context: &str) -> Result<ExitStatus> {
        let mut args = self.base_args();
        args.extend(subcommand.iter().copied().map(OsString::from));

        Command::new("docker")
            .args(args)
            .status()
            .with_context(|| context.to_string())
    }
}

impl ComposeRuntime for ComposeAdapter {
    fn start_all(&self) -> Result<()> {
        self.compose(&["up", "-d"], "starting compose stack")
    }

    fn stop_all(&self) -> Result<()> {
        self.compose(&["down"], "stopping compose stack")
    }

    fn query_state(&self, service: &str) -> Result<ServiceState> {
        let mut args = self.base_args();
        args.push("ps".into());

        let output = Command::new("docker")
            .args(args)
            .stdout(Stdio::piped())
            .output()
            .with_context(|| format!("listing compose services for {service}"))?;

        if !output.status.success() {
            return Ok(ServiceState::Down);
        }

        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(parse_service_state(&listing, service))
    }
}

/// Scans a `docker compose ps` listing for a line naming `service` with an
/// `Up` marker after it. Anything else is `Down`; the listing is a
/// heuristic signal, not a stable format.
pub fn parse_service_state(listing: &str, service: &str) -> ServiceState {
    for line in listing.lines() {
        if let Some((_, rest)) = line.split_once(service)
            && rest.split_whitespace().any(|word| word == "Up")
        {
            return ServiceState::Up;
        }
    }

    ServiceState::Down
}

fn ensure_success(status: ExitStatus, context: &str) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    bail!("docker compose exited with status {:?} ({context})", status)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
NAME                IMAGE          COMMAND                  SERVICE   CREATED         STATUS
deploy-backend-1    backend:live   \"uvicorn main:app\"       backend   2 minutes ago   Up 2 minutes
deploy-db-1         postgres:15    \"docker-entrypoint.s…\"   db        2 minutes ago   Exited (1) 1 minute ago
";

    #[test]
    fn up_marker_after_service_name_is_up() {
        assert_eq!(parse_service_state(LISTING, "backend"), ServiceState::Up);
    }

    #[test]
    fn exited_service_is_down() {
        assert_eq!(parse_service_state(LISTING, "db"), ServiceState::Down);
    }

    #[test]
    fn unknown_service_is_down() {
        assert_eq!(parse_service_state(LISTING, "cache"), ServiceState::Down);
    }

    #[test]
    fn empty_listing_is_down() {
        assert_eq!(parse_service_state("", "backend"), ServiceState::Down);
    }

    #[test]
    fn up_marker_must_follow_the_service_name() {
        // "Up" elsewhere on an unrelated line must not leak into the match.
        let listing = "something Up somewhere\nbackend   Exited (0)\n";
        assert_eq!(parse_service_state(listing, "backend"), ServiceState::Down);
    }

    #[test]
    fn up_inside_a_longer_word_does_not_count() {
        let listing = "deploy-backend-1  backend  Updating\n";
        assert_eq!(parse_service_state(listing, "backend"), ServiceState::Down);
    }
}

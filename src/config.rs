use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Deploy settings, read from `tunnelup.toml` in the config directory.
/// A missing file yields the defaults; CLI flags override on top.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeployConfig {
    /// Compose service whose readiness gates the run.
    pub service: String,
    /// Port the funnel binds and the socket check inspects.
    pub port: u16,
    /// Compose file to pass with `-f`; compose's own discovery applies
    /// when unset. Tilde-expanded.
    pub compose_file: Option<String>,
    /// Deadline for the readiness poll loop.
    pub readiness_wait_secs: u64,
    /// Interval between readiness probes.
    pub poll_interval_secs: u64,
    /// Run tunnel activation and socket inspection under sudo.
    pub sudo: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            service: "backend".to_string(),
            port: 8443,
            compose_file: None,
            readiness_wait_secs: 10,
            poll_interval_secs: 2,
            sudo: true,
        }
    }
}

impl DeployConfig {
    pub fn compose_file_path(&self) -> Option<PathBuf> {
        self.compose_file
            .as_deref()
            .map(|raw| PathBuf::from(shellexpand::tilde(raw).into_owned()))
    }
}

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/root"))
        .join(".config/tunnelup")
}

pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join("tunnelup.toml")
}

pub fn load_config(config_dir: &Path) -> Result<DeployConfig> {
    let path = config_path(config_dir);

    if !path.exists() {
        return Ok(DeployConfig::default());
    }

    let content = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    parse_config(&content, &path)
}

fn parse_config(content: &str, path: &Path) -> Result<DeployConfig> {
    if content.trim().is_empty() {
        return Ok(DeployConfig::default());
    }

    let config: DeployConfig =
        toml::from_str(content).with_context(|| format!("parsing {:?}", path))?;

    if config.service.trim().is_empty() {
        bail!("'service' in {:?} must not be empty", path);
    }

    if config.poll_interval_secs == 0 {
        bail!("'poll_interval_secs' in {:?} must be at least 1", path);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn defaults_match_the_fixed_deployment() {
        let config = DeployConfig::default();
        assert_eq!(config.service, "backend");
        assert_eq!(config.port, 8443);
        assert_eq!(config.readiness_wait_secs, 10);
        assert_eq!(config.poll_interval_secs, 2);
        assert!(config.sudo);
        assert!(config.compose_file.is_none());
    }

    #[test]
    fn parses_full_document() {
        let doc = r#"
service = "api"
port = 9443
compose_file = "~/deploy/docker-compose.yml"
readiness_wait_secs = 30
poll_interval_secs = 5
sudo = false
"#;

        let config = parse_config(doc, Path::new("tunnelup.toml")).unwrap();
        assert_eq!(config.service, "api");
        assert_eq!(config.port, 9443);
        assert_eq!(config.readiness_wait_secs, 30);
        assert!(!config.sudo);

        let path = config.compose_file_path().unwrap();
        assert!(!path.to_string_lossy().contains('~'));
        assert!(path.to_string_lossy().ends_with("deploy/docker-compose.yml"));
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let doc = "port = 8080\n";

        let config = parse_config(doc, Path::new("tunnelup.toml")).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.service, "backend");
        assert_eq!(config.readiness_wait_secs, 10);
    }

    #[test]
    fn empty_document_is_defaults() {
        let config = parse_config("  \n", Path::new("tunnelup.toml")).unwrap();
        assert_eq!(config, DeployConfig::default());
    }

    #[test]
    fn rejects_empty_service_name() {
        let err = parse_config("service = \"  \"\n", Path::new("tunnelup.toml")).unwrap_err();
        assert!(err.to_string().contains("'service'"));
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let err =
            parse_config("poll_interval_secs = 0\n", Path::new("tunnelup.toml")).unwrap_err();
        assert!(err.to_string().contains("poll_interval_secs"));
    }
}

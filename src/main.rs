use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tunnelup::cli::{DeployOverrides, Deployment, doctor};
use tunnelup::config;

#[derive(Parser)]
#[command(
    name = "tunnelup",
    about = "Bring a compose stack up and expose it through a Tailscale funnel"
)]
struct Cli {
    /// Configuration directory (default: ~/.config/tunnelup)
    #[arg(long, env = "TUNNELUP_CONFIG_DIR", default_value_os_t = config::default_config_dir())]
    config_dir: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the stack, wait for readiness, bind the funnel, verify, report
    Up(DeployOverrides),
    /// Take the stack down and reset the funnel
    Down(DeployOverrides),
    /// One-shot report of service, funnel and port state
    Status(DeployOverrides),
    /// Check that docker, tailscale and ss are available
    Doctor,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Up(overrides) => Deployment::new(&cli.config_dir, overrides)?.up(),
        Commands::Down(overrides) => Deployment::new(&cli.config_dir, overrides)?.down(),
        Commands::Status(overrides) => Deployment::new(&cli.config_dir, overrides)?.status(),
        Commands::Doctor => doctor::run(&cli.config_dir),
    }
}

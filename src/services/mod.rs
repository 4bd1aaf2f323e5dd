mod orchestrator;
mod readiness;
mod stack_service;
mod tunnel_service;

pub use orchestrator::{Orchestrator, StatusSnapshot};
pub use readiness::ReadinessProber;
pub use stack_service::StackService;
pub use tunnel_service::TunnelService;

mod deployment;
pub mod traits;

pub use deployment::{
    PortBinding, Privilege, RunReport, ServiceDescriptor, ServiceState, TunnelStatus,
};
pub use traits::{ComposeRuntime, SocketInspector, TunnelClient};

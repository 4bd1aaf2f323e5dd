pub mod compose_adapter;
pub mod socket_adapter;
pub mod tailscale_adapter;

pub use compose_adapter::ComposeAdapter;
pub use socket_adapter::SocketTableAdapter;
pub use tailscale_adapter::TailscaleAdapter;

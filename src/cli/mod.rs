pub mod deploy;
pub mod doctor;

pub use deploy::{DeployOverrides, Deployment};

//! Wire payload definitions

pub mod credentials;
pub mod status;

pub use {
    credentials::WifiCredentials,
    status::{ProvisionStatus, StatusMessage},
};

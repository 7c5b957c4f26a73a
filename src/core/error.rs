//! Error types for the provisioning client

use std::time::Duration;

use thiserror::Error;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for provisioning operations
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Errors surfaced by the BLE transport layer
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Bluetooth adapter unavailable: {0}")]
    AdapterUnavailable(String),

    #[error("Scan failed: {0}")]
    ScanFailed(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not connected to a device")]
    NotConnected,

    #[error("Service discovery failed: {0}")]
    DiscoveryFailed(String),

    #[error("Notification subscription failed: {0}")]
    SubscribeFailed(String),

    #[error("Characteristic write failed: {0}")]
    WriteFailed(String),

    #[error("BLE error: {0}")]
    Ble(String),
}

/// Errors produced by a provisioning run
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Device '{0}' not found during scan")]
    DeviceNotFound(String),

    #[error("No writable and notifiable characteristic pair found")]
    CharacteristicsNotFound,

    #[error("No response from device within {0:?}")]
    ResponseTimeout(Duration),

    #[error("Device rejected credentials: {0}")]
    Rejected(String),

    #[error("All {attempts} connection attempts failed")]
    AttemptsExhausted {
        attempts: u32,
        #[source]
        source: Box<ProvisionError>,
    },

    #[error("Credential payload could not be encoded: {0}")]
    PayloadEncoding(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

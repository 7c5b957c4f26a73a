//! BLE WiFi Provisioning Client
//!
//! A one-shot client that provisions WiFi credentials onto a BLE peripheral:
//! scan for the device by advertised name, connect, discover a writable and a
//! notifiable GATT characteristic, write the credential payload and wait for
//! the peripheral to confirm via notification.

pub mod config;
pub mod core;
pub mod protocol;
pub mod transport;

pub use crate::core::{
    error::{ProvisionError, ProvisionResult, TransportError, TransportResult},
    types::{DiscoveredDevice, GattCharacteristic, ProvisionReport},
};

//! BLE central trait definition

use std::time::Duration;

use trait_variant::make;

use crate::core::error::TransportResult;
use crate::core::types::{DiscoveredDevice, GattCharacteristic};

/// Raw notification values from a subscribed characteristic
pub type Notifications = tokio::sync::mpsc::Receiver<Vec<u8>>;

/// Abstraction over the platform BLE central role
///
/// This trait enables testing by allowing mock implementations
/// while providing the discovery, connection and GATT operations
/// the provisioner needs.
#[make(Send)]
pub trait BleCentral: Sync + 'static {
    /// Scan for advertising peripherals for the given duration
    ///
    /// Returns the named devices visible once the scan window closes.
    async fn scan(&self, duration: Duration) -> TransportResult<Vec<DiscoveredDevice>>;

    /// Connect to a previously discovered peripheral and resolve its GATT
    /// services
    async fn connect(&self, device: &DiscoveredDevice) -> TransportResult<()>;

    /// Drop the current connection
    async fn disconnect(&self) -> TransportResult<()>;

    /// Enumerate GATT characteristics with their capability flags
    async fn characteristics(&self) -> TransportResult<Vec<GattCharacteristic>>;

    /// Subscribe to notifications from the given characteristic
    async fn subscribe(
        &self,
        characteristic: &GattCharacteristic,
    ) -> TransportResult<Notifications>;

    /// Write a value to the given characteristic
    async fn write(&self, characteristic: &GattCharacteristic, value: &[u8])
    -> TransportResult<()>;
}

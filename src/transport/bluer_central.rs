//! BLE central backed by BlueZ via bluer

use std::collections::HashMap;
use std::time::Duration;

use bluer::gatt::remote::Characteristic;
use bluer::{Adapter, AdapterEvent, Address, Device};
use futures::{StreamExt, pin_mut};
use tokio::sync::{RwLock, mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{TransportError, TransportResult};
use crate::core::types::{CharacteristicFlags, DiscoveredDevice, GattCharacteristic};
use crate::transport::ble_central::{BleCentral, Notifications};

/// Notifications buffered per subscription before the forwarder blocks
const NOTIFICATION_CHANNEL_CAPACITY: usize = 16;

/// State of the currently connected peripheral
///
/// Characteristics are kept in discovery order so that first-match
/// selection is stable across runs.
struct Connection {
    device: Device,
    characteristics: Vec<(Uuid, Characteristic)>,
}

impl Connection {
    fn characteristic(&self, uuid: Uuid) -> Option<&Characteristic> {
        self.characteristics
            .iter()
            .find(|(candidate, _)| *candidate == uuid)
            .map(|(_, characteristic)| characteristic)
    }
}

/// BlueZ-backed BLE central
pub struct BluerCentral {
    adapter: Adapter,
    discovered: RwLock<HashMap<String, Device>>,
    connection: RwLock<Option<Connection>>,
}

impl BluerCentral {
    /// Create a central using the default Bluetooth adapter
    pub async fn new() -> TransportResult<Self> {
        let session = bluer::Session::new().await.map_err(adapter_error)?;
        let adapter = session.default_adapter().await.map_err(adapter_error)?;
        adapter.set_powered(true).await.map_err(adapter_error)?;

        info!("Using BLE adapter: {}", adapter.name());

        Ok(Self {
            adapter,
            discovered: RwLock::new(HashMap::new()),
            connection: RwLock::new(None),
        })
    }

    /// Query name and address of a device known to the adapter
    ///
    /// Unnamed devices are skipped, matching can only happen by name.
    async fn describe(&self, address: Address) -> bluer::Result<Option<(DiscoveredDevice, Device)>> {
        let device = self.adapter.device(address)?;
        let name = device.name().await?;
        Ok(name.map(|name| {
            (
                DiscoveredDevice {
                    name,
                    address: address.to_string(),
                },
                device,
            )
        }))
    }
}

fn adapter_error(e: bluer::Error) -> TransportError {
    TransportError::AdapterUnavailable(e.to_string())
}

fn scan_error(e: bluer::Error) -> TransportError {
    TransportError::ScanFailed(e.to_string())
}

fn discovery_error(e: bluer::Error) -> TransportError {
    TransportError::DiscoveryFailed(e.to_string())
}

impl BleCentral for BluerCentral {
    async fn scan(&self, duration: Duration) -> TransportResult<Vec<DiscoveredDevice>> {
        let events = self.adapter.discover_devices().await.map_err(scan_error)?;
        pin_mut!(events);

        let deadline = tokio::time::sleep(duration);
        pin_mut!(deadline);

        // Keep the discovery session alive for the whole window while
        // draining adapter events.
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                event = events.next() => match event {
                    Some(AdapterEvent::DeviceAdded(address)) => {
                        debug!("Device appeared: {address}");
                    }
                    Some(_) => {}
                    None => break,
                },
            }
        }

        let mut devices = Vec::new();
        let mut discovered = self.discovered.write().await;
        discovered.clear();

        for address in self
            .adapter
            .device_addresses()
            .await
            .map_err(scan_error)?
        {
            match self.describe(address).await {
                Ok(Some((info, device))) => {
                    discovered.insert(info.address.clone(), device);
                    devices.push(info);
                }
                Ok(None) => debug!("Skipping unnamed device {address}"),
                Err(e) => warn!("Failed to query device {address}: {e}"),
            }
        }

        info!("Scan finished, {} named device(s) visible", devices.len());
        Ok(devices)
    }

    async fn connect(&self, target: &DiscoveredDevice) -> TransportResult<()> {
        let device = self
            .discovered
            .read()
            .await
            .get(&target.address)
            .cloned()
            .ok_or_else(|| {
                TransportError::ConnectionFailed(format!("unknown device {}", target.address))
            })?;

        let connected = device
            .is_connected()
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        if !connected {
            device
                .connect()
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        }
        info!("Connected to {target}");

        // Resolve all characteristics up front so subscribe/write become
        // plain lookups.
        let mut characteristics = Vec::new();
        for service in device.services().await.map_err(discovery_error)? {
            let service_uuid = service.uuid().await.map_err(discovery_error)?;
            debug!("Discovered service {service_uuid}");

            for characteristic in service.characteristics().await.map_err(discovery_error)? {
                let uuid = characteristic.uuid().await.map_err(discovery_error)?;
                characteristics.push((uuid, characteristic));
            }
        }

        *self.connection.write().await = Some(Connection {
            device,
            characteristics,
        });
        Ok(())
    }

    async fn disconnect(&self) -> TransportResult<()> {
        if let Some(connection) = self.connection.write().await.take() {
            connection
                .device
                .disconnect()
                .await
                .map_err(|e| TransportError::Ble(e.to_string()))?;
            debug!("Disconnected");
        }
        Ok(())
    }

    async fn characteristics(&self) -> TransportResult<Vec<GattCharacteristic>> {
        let guard = self.connection.read().await;
        let connection = guard.as_ref().ok_or(TransportError::NotConnected)?;

        let mut result = Vec::with_capacity(connection.characteristics.len());
        for (uuid, characteristic) in &connection.characteristics {
            let flags = characteristic.flags().await.map_err(discovery_error)?;
            result.push(GattCharacteristic {
                uuid: *uuid,
                flags: CharacteristicFlags {
                    read: flags.read,
                    write: flags.write || flags.write_without_response,
                    notify: flags.notify,
                },
            });
        }
        Ok(result)
    }

    async fn subscribe(
        &self,
        characteristic: &GattCharacteristic,
    ) -> TransportResult<Notifications> {
        let remote = {
            let guard = self.connection.read().await;
            let connection = guard.as_ref().ok_or(TransportError::NotConnected)?;
            connection
                .characteristic(characteristic.uuid)
                .cloned()
                .ok_or_else(|| {
                    TransportError::SubscribeFailed(format!(
                        "unknown characteristic {}",
                        characteristic.uuid
                    ))
                })?
        };

        let (tx, rx) = mpsc::channel(NOTIFICATION_CHANNEL_CAPACITY);
        let (ready_tx, ready_rx) = oneshot::channel();

        // Bridge the bluer notification stream into the channel the
        // provisioner blocks on. The stream borrows the characteristic, so
        // both live in the forwarding task.
        tokio::spawn(async move {
            let stream = match remote.notify().await {
                Ok(stream) => {
                    let _ = ready_tx.send(Ok(()));
                    stream
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            pin_mut!(stream);
            while let Some(value) = stream.next().await {
                if tx.send(value).await.is_err() {
                    break;
                }
            }
            debug!("Notification stream closed");
        });

        ready_rx
            .await
            .map_err(|_| TransportError::SubscribeFailed("subscription task ended".into()))?
            .map_err(|e| TransportError::SubscribeFailed(e.to_string()))?;
        Ok(rx)
    }

    async fn write(
        &self,
        characteristic: &GattCharacteristic,
        value: &[u8],
    ) -> TransportResult<()> {
        let guard = self.connection.read().await;
        let connection = guard.as_ref().ok_or(TransportError::NotConnected)?;
        let remote = connection.characteristic(characteristic.uuid).ok_or_else(|| {
            TransportError::WriteFailed(format!(
                "unknown characteristic {}",
                characteristic.uuid
            ))
        })?;

        remote
            .write(value)
            .await
            .map_err(|e| TransportError::WriteFailed(e.to_string()))?;
        debug!("Wrote {} bytes to {}", value.len(), characteristic.uuid);
        Ok(())
    }
}

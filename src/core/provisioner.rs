//! One-shot provisioning flow with retry and timeout handling

use std::sync::Arc;

use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::{
    config::Settings,
    core::{
        error::{ProvisionError, ProvisionResult, TransportError},
        types::{DiscoveredDevice, GattCharacteristic, ProvisionReport},
    },
    protocol::{StatusMessage, WifiCredentials},
    transport::{BleCentral, Notifications},
};

/// Characteristic pair selected during discovery
#[derive(Debug, Clone)]
struct SelectedCharacteristics {
    write: GattCharacteristic,
    notify: GattCharacteristic,
}

/// Select the first writable and the first notifiable characteristic
///
/// A single characteristic may fill both roles. Returns None when either
/// capability is missing from the peripheral.
fn select_characteristics(
    characteristics: &[GattCharacteristic],
) -> Option<SelectedCharacteristics> {
    let write = characteristics.iter().find(|c| c.is_writable())?.clone();
    let notify = characteristics.iter().find(|c| c.is_notifiable())?.clone();
    Some(SelectedCharacteristics { write, notify })
}

/// BLE WiFi provisioner
///
/// Drives the scan, connect, discover, write and await-confirmation sequence
/// against a [`BleCentral`] implementation.
pub struct Provisioner<B: BleCentral> {
    central: Arc<B>,
    settings: Settings,
}

impl<B: BleCentral> Provisioner<B> {
    /// Create a new provisioner
    pub fn new(central: Arc<B>, settings: Settings) -> Self {
        Self { central, settings }
    }

    /// Scan once and locate the target device by advertised name
    ///
    /// The first peripheral whose name matches exactly is used.
    pub async fn find_device(&self) -> ProvisionResult<DiscoveredDevice> {
        info!(
            "Scanning {:?} for device '{}'",
            self.settings.scan_duration, self.settings.device_name
        );

        let devices = self.central.scan(self.settings.scan_duration).await?;
        for device in &devices {
            debug!("Discovered {device}");
        }

        devices
            .into_iter()
            .find(|d| d.name == self.settings.device_name)
            .inspect(|device| info!("Found device {device}"))
            .ok_or_else(|| ProvisionError::DeviceNotFound(self.settings.device_name.clone()))
    }

    /// Run the full provisioning flow: scan, then provision
    pub async fn run(&self, credentials: &WifiCredentials) -> ProvisionResult<ProvisionReport> {
        let device = self.find_device().await?;
        self.provision(&device, credentials).await
    }

    /// Provision a discovered device, retrying transient failures
    ///
    /// Connection, discovery, subscription and write failures are retried up
    /// to the configured attempt budget with a fixed delay in between. A
    /// response timeout after a delivered write and an explicit rejection by
    /// the peripheral are terminal.
    pub async fn provision(
        &self,
        device: &DiscoveredDevice,
        credentials: &WifiCredentials,
    ) -> ProvisionResult<ProvisionReport> {
        let payload = credentials.to_payload()?;
        let mut last_error = None;

        for attempt in 1..=self.settings.retry_count {
            info!(
                "Connection attempt {attempt}/{} to {device}",
                self.settings.retry_count
            );

            match self.attempt(device, &payload).await {
                Ok(message) => {
                    return Ok(ProvisionReport {
                        device: device.clone(),
                        attempts: attempt,
                        message,
                    });
                }
                Err(e @ (ProvisionError::ResponseTimeout(_) | ProvisionError::Rejected(_))) => {
                    return Err(e);
                }
                Err(e) => {
                    warn!("Attempt {attempt} failed: {e}");
                    last_error = Some(e);
                }
            }

            if attempt < self.settings.retry_count {
                sleep(self.settings.retry_delay).await;
            }
        }

        error!(
            "All {} connection attempts to {device} failed",
            self.settings.retry_count
        );
        Err(ProvisionError::AttemptsExhausted {
            attempts: self.settings.retry_count,
            source: Box::new(last_error.unwrap_or_else(|| {
                ProvisionError::Transport(TransportError::ConnectionFailed(
                    "retry budget is zero".into(),
                ))
            })),
        })
    }

    /// One connect, discover, subscribe, write, await cycle
    ///
    /// The connection is released when the attempt ends, whatever the
    /// outcome.
    async fn attempt(&self, device: &DiscoveredDevice, payload: &[u8]) -> ProvisionResult<String> {
        let result = self.exchange(device, payload).await;

        if let Err(e) = self.central.disconnect().await {
            debug!("Disconnect failed: {e}");
        }

        result
    }

    async fn exchange(&self, device: &DiscoveredDevice, payload: &[u8]) -> ProvisionResult<String> {
        match timeout(self.settings.connect_timeout, self.central.connect(device)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(TransportError::ConnectionFailed(format!(
                    "no connection within {:?}",
                    self.settings.connect_timeout
                ))
                .into());
            }
        }

        let characteristics = self.central.characteristics().await?;
        debug!("Peripheral exposes {} characteristic(s)", characteristics.len());
        for characteristic in &characteristics {
            debug!(
                "  {} (flags: {:?})",
                characteristic.uuid, characteristic.flags
            );
        }

        let selected = select_characteristics(&characteristics)
            .ok_or(ProvisionError::CharacteristicsNotFound)?;
        debug!("Write characteristic: {}", selected.write.uuid);
        debug!("Notify characteristic: {}", selected.notify.uuid);

        let mut notifications = self.central.subscribe(&selected.notify).await?;
        debug!("Notifications enabled");

        info!("Sending WiFi credentials ({} bytes)", payload.len());
        self.central.write(&selected.write, payload).await?;

        let status = self.await_status(&mut notifications).await?;
        if status.is_ok() {
            info!("Provisioning confirmed: {}", status.error_message);
            Ok(status.error_message)
        } else {
            error!("Provisioning rejected: {}", status.error_message);
            Err(ProvisionError::Rejected(status.error_message))
        }
    }

    /// Wait for a provisioning status notification under the response timeout
    ///
    /// Notifications that fail to parse or carry another message type are
    /// discarded and the wait continues.
    async fn await_status(&self, notifications: &mut Notifications) -> ProvisionResult<StatusMessage> {
        let next_status = async {
            loop {
                match notifications.recv().await {
                    Some(data) => match StatusMessage::from_bytes(&data) {
                        Ok(message) if message.is_wifi_config() => break Some(message),
                        Ok(message) => {
                            debug!("Ignoring notification of type '{}'", message.message_type);
                        }
                        Err(e) => warn!("Discarding malformed notification: {e}"),
                    },
                    None => break None,
                }
            }
        };

        match timeout(self.settings.response_timeout, next_status).await {
            Ok(Some(message)) => Ok(message),
            Ok(None) => Err(TransportError::Ble(
                "notification stream closed before a status arrived".into(),
            )
            .into()),
            Err(_) => Err(ProvisionError::ResponseTimeout(
                self.settings.response_timeout,
            )),
        }
    }
}

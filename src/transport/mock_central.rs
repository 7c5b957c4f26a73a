//! Mock BLE central for testing

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};

use crate::core::error::{TransportError, TransportResult};
use crate::core::types::{DiscoveredDevice, GattCharacteristic};
use crate::transport::ble_central::{BleCentral, Notifications};

/// Internal state for the mock central
#[derive(Debug)]
struct MockState {
    devices: Vec<DiscoveredDevice>,
    characteristics: Vec<GattCharacteristic>,
    should_fail_scan: bool,
    connect_failures: u32,
    should_fail_subscribe: bool,
    should_fail_write: bool,
    responses: Vec<Vec<u8>>,
    notifier: Option<mpsc::Sender<Vec<u8>>>,
    connect_attempts: u32,
    written: Vec<Vec<u8>>,
    connected: bool,
}

/// Mock BLE central for testing
///
/// Allows scripting scan results, transient connection failures and
/// notification responses without requiring actual hardware.
#[derive(Debug, Clone)]
pub struct MockBleCentral {
    inner: Arc<Mutex<MockState>>,
}

impl MockBleCentral {
    /// Create a new mock central with default state
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                devices: vec![],
                characteristics: vec![],
                should_fail_scan: false,
                connect_failures: 0,
                should_fail_subscribe: false,
                should_fail_write: false,
                responses: vec![],
                notifier: None,
                connect_attempts: 0,
                written: vec![],
                connected: false,
            })),
        }
    }

    /// Configure the peripherals visible to a scan
    pub async fn set_devices(&self, devices: Vec<DiscoveredDevice>) {
        self.inner.lock().await.devices = devices;
    }

    /// Configure the characteristics the connected peripheral exposes
    pub async fn set_characteristics(&self, characteristics: Vec<GattCharacteristic>) {
        self.inner.lock().await.characteristics = characteristics;
    }

    /// Configure mock to fail scan operations
    pub async fn set_scan_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_scan = should_fail;
    }

    /// Make the next `count` connection attempts fail before succeeding
    pub async fn set_connect_failures(&self, count: u32) {
        self.inner.lock().await.connect_failures = count;
    }

    /// Configure mock to fail notification subscription
    pub async fn set_subscribe_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_subscribe = should_fail;
    }

    /// Configure mock to fail characteristic writes
    pub async fn set_write_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_write = should_fail;
    }

    /// Queue notification values delivered after the next accepted write
    pub async fn set_responses(&self, responses: Vec<Vec<u8>>) {
        self.inner.lock().await.responses = responses;
    }

    /// Number of connection attempts made so far
    pub async fn connect_attempts(&self) -> u32 {
        self.inner.lock().await.connect_attempts
    }

    /// Payloads written to the peripheral, in order
    pub async fn written_payloads(&self) -> Vec<Vec<u8>> {
        self.inner.lock().await.written.clone()
    }

    /// Whether a connection is currently held
    pub async fn is_connected(&self) -> bool {
        self.inner.lock().await.connected
    }
}

impl Default for MockBleCentral {
    fn default() -> Self {
        Self::new()
    }
}

impl BleCentral for MockBleCentral {
    async fn scan(&self, _duration: Duration) -> TransportResult<Vec<DiscoveredDevice>> {
        let state = self.inner.lock().await;
        if state.should_fail_scan {
            Err(TransportError::ScanFailed("mock scan failure".into()))
        } else {
            Ok(state.devices.clone())
        }
    }

    async fn connect(&self, _device: &DiscoveredDevice) -> TransportResult<()> {
        let mut state = self.inner.lock().await;
        state.connect_attempts += 1;
        if state.connect_failures > 0 {
            state.connect_failures -= 1;
            Err(TransportError::ConnectionFailed(
                "mock connect failure".into(),
            ))
        } else {
            state.connected = true;
            Ok(())
        }
    }

    async fn disconnect(&self) -> TransportResult<()> {
        let mut state = self.inner.lock().await;
        state.connected = false;
        state.notifier = None;
        Ok(())
    }

    async fn characteristics(&self) -> TransportResult<Vec<GattCharacteristic>> {
        let state = self.inner.lock().await;
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        Ok(state.characteristics.clone())
    }

    async fn subscribe(
        &self,
        _characteristic: &GattCharacteristic,
    ) -> TransportResult<Notifications> {
        let mut state = self.inner.lock().await;
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        if state.should_fail_subscribe {
            return Err(TransportError::SubscribeFailed(
                "mock subscribe failure".into(),
            ));
        }
        let (tx, rx) = mpsc::channel(16);
        state.notifier = Some(tx);
        Ok(rx)
    }

    async fn write(
        &self,
        _characteristic: &GattCharacteristic,
        value: &[u8],
    ) -> TransportResult<()> {
        let (notifier, responses) = {
            let mut state = self.inner.lock().await;
            if !state.connected {
                return Err(TransportError::NotConnected);
            }
            if state.should_fail_write {
                return Err(TransportError::WriteFailed("mock write failure".into()));
            }
            state.written.push(value.to_vec());
            (state.notifier.clone(), std::mem::take(&mut state.responses))
        };

        if let Some(notifier) = notifier {
            for response in responses {
                if notifier.send(response).await.is_err() {
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::core::types::CharacteristicFlags;

    fn device() -> DiscoveredDevice {
        DiscoveredDevice {
            name: "ai-toys".into(),
            address: "AA:BB:CC:DD:EE:FF".into(),
        }
    }

    #[tokio::test]
    async fn test_mock_scan() {
        let central = MockBleCentral::new();

        let results = central.scan(Duration::from_secs(1)).await.unwrap();
        assert!(results.is_empty());

        central.set_devices(vec![device()]).await;
        let results = central.scan(Duration::from_secs(1)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "ai-toys");
    }

    #[tokio::test]
    async fn test_mock_connect_failure_budget() {
        let central = MockBleCentral::new();
        central.set_connect_failures(2).await;

        assert!(central.connect(&device()).await.is_err());
        assert!(central.connect(&device()).await.is_err());
        assert!(central.connect(&device()).await.is_ok());
        assert_eq!(central.connect_attempts().await, 3);
    }

    #[tokio::test]
    async fn test_mock_requires_connection() {
        let central = MockBleCentral::new();

        let result = central.characteristics().await;
        assert!(matches!(result, Err(TransportError::NotConnected)));
    }

    #[tokio::test]
    async fn test_mock_write_delivers_responses() {
        let central = MockBleCentral::new();
        central.connect(&device()).await.unwrap();

        let characteristic = GattCharacteristic {
            uuid: Uuid::from_u128(0x1),
            flags: CharacteristicFlags {
                read: false,
                write: true,
                notify: true,
            },
        };

        let mut notifications = central.subscribe(&characteristic).await.unwrap();
        central.set_responses(vec![b"hello".to_vec()]).await;
        central.write(&characteristic, b"payload").await.unwrap();

        assert_eq!(notifications.recv().await.unwrap(), b"hello");
        assert_eq!(central.written_payloads().await, vec![b"payload".to_vec()]);
    }
}

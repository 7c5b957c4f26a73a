//! Domain types for BLE provisioning

use uuid::Uuid;

/// A peripheral discovered during scanning
///
/// Ephemeral handle, valid only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Advertised device name
    pub name: String,
    /// Bluetooth address
    pub address: String,
}

impl std::fmt::Display for DiscoveredDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

/// Capability flags of a GATT characteristic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacteristicFlags {
    pub read: bool,
    pub write: bool,
    pub notify: bool,
}

/// A GATT characteristic exposed by the connected peripheral
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GattCharacteristic {
    pub uuid: Uuid,
    pub flags: CharacteristicFlags,
}

impl GattCharacteristic {
    /// Whether credentials can be written to this characteristic
    pub fn is_writable(&self) -> bool {
        self.flags.write
    }

    /// Whether this characteristic can deliver notifications
    pub fn is_notifiable(&self) -> bool {
        self.flags.notify
    }
}

/// Summary of a successful provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    /// The provisioned peripheral
    pub device: DiscoveredDevice,
    /// Connection attempts used, including the successful one
    pub attempts: u32,
    /// Confirmation message reported by the peripheral
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_display() {
        let device = DiscoveredDevice {
            name: "ai-toys".into(),
            address: "AA:BB:CC:DD:EE:FF".into(),
        };
        assert_eq!(device.to_string(), "ai-toys (AA:BB:CC:DD:EE:FF)");
    }

    #[test]
    fn test_characteristic_predicates() {
        let characteristic = GattCharacteristic {
            uuid: Uuid::from_u128(0x1),
            flags: CharacteristicFlags {
                read: true,
                write: true,
                notify: false,
            },
        };
        assert!(characteristic.is_writable());
        assert!(!characteristic.is_notifiable());
    }
}

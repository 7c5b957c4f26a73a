//! Status notification sent by the peripheral after a credential write

use serde::{Deserialize, Serialize};

/// Message type carried by provisioning status notifications
pub const WIFI_CONFIG_TYPE: &str = "wifi_config";

/// Outcome reported by the peripheral
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProvisionStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NOT_OK")]
    NotOk,
}

/// Parsed notification payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub status: ProvisionStatus,
    #[serde(default)]
    pub error_message: String,
}

impl StatusMessage {
    /// Parse a raw notification value
    pub fn from_bytes(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }

    /// Whether this message is a provisioning status response
    pub fn is_wifi_config(&self) -> bool {
        self.message_type == WIFI_CONFIG_TYPE
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, ProvisionStatus::Ok)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_ok_notification() {
        let data =
            br#"{"type":"wifi_config","status":"OK","error_message":"WiFi connected successfully"}"#;
        let message = StatusMessage::from_bytes(data).unwrap();

        assert!(message.is_wifi_config());
        assert!(message.is_ok());
        assert_eq!(message.error_message, "WiFi connected successfully");
    }

    #[test]
    fn test_parse_not_ok_notification() {
        let data =
            br#"{"type":"wifi_config","status":"NOT_OK","error_message":"Failed to connect to WiFi"}"#;
        let message = StatusMessage::from_bytes(data).unwrap();

        assert!(message.is_wifi_config());
        assert!(!message.is_ok());
        assert_eq!(message.error_message, "Failed to connect to WiFi");
    }

    #[test]
    fn test_error_message_defaults_to_empty() {
        let data = br#"{"type":"wifi_config","status":"OK"}"#;
        let message = StatusMessage::from_bytes(data).unwrap();

        assert!(message.is_ok());
        assert_eq!(message.error_message, "");
    }

    #[test]
    fn test_unknown_status_rejected() {
        let data = br#"{"type":"wifi_config","status":"MAYBE","error_message":""}"#;
        assert!(StatusMessage::from_bytes(data).is_err());
    }

    #[test]
    fn test_other_message_type() {
        let data = br#"{"type":"battery","status":"OK","error_message":""}"#;
        let message = StatusMessage::from_bytes(data).unwrap();
        assert!(!message.is_wifi_config());
    }

    #[test]
    fn test_malformed_payload_rejected() {
        assert!(StatusMessage::from_bytes(b"not json").is_err());
    }

    #[test]
    fn test_status_serialization() {
        let message = StatusMessage {
            message_type: WIFI_CONFIG_TYPE.to_string(),
            status: ProvisionStatus::NotOk,
            error_message: "Missing SSID or password".to_string(),
        };
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""type":"wifi_config""#));
        assert!(json.contains(r#""status":"NOT_OK""#));
    }
}

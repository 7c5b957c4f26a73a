//! Credential payload written to the peripheral

use serde::{Deserialize, Serialize};

/// WiFi credentials transmitted as a UTF-8 JSON characteristic write
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiCredentials {
    /// Network SSID
    pub ssid: String,
    /// Network passphrase
    pub password: String,
}

impl WifiCredentials {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
        }
    }

    /// Encode as the JSON wire payload
    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_credentials_serialization() {
        let credentials = WifiCredentials::new("MyNetwork", "secret123");
        let json = serde_json::to_string(&credentials).unwrap();
        assert_eq!(json, r#"{"ssid":"MyNetwork","password":"secret123"}"#);
    }

    #[test]
    fn test_payload_round_trip() {
        let credentials = WifiCredentials::new("wds", "wds666666");
        let payload = credentials.to_payload().unwrap();

        let decoded: WifiCredentials = serde_json::from_slice(&payload).unwrap();
        assert_eq!(decoded, credentials);
    }

    #[test]
    fn test_payload_is_utf8_json() {
        let credentials = WifiCredentials::new("Café-5G", "pässword");
        let payload = credentials.to_payload().unwrap();

        let text = String::from_utf8(payload).unwrap();
        assert!(text.contains("Café-5G"));
    }
}

//! Broadcast message format
//!
//! An intent is an action name plus a flat map of typed extras. On the wire
//! it is a single JSON object:
//!
//! ```json
//! {"action":"org.nexleaf.shared.ACTION_RADIO_ON","extras":{"sender":{"string":"rebooter"},"onInterval":{"long":900000}}}
//! ```
//!
//! Each extra carries its type so an `int` and a `long` stay distinct.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ask the radio-control component to bring connectivity up
pub const ACTION_RADIO_ON: &str = "org.nexleaf.shared.ACTION_RADIO_ON";

/// Ask the radio-control component to send an SMS
pub const ACTION_SEND_SMS: &str = "org.nexleaf.shared.ACTION_SEND_SMS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extra {
    Int(i32),
    Long(i64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub action: String,
    #[serde(default)]
    pub extras: BTreeMap<String, Extra>,
}

impl Intent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extras: BTreeMap::new(),
        }
    }

    pub fn put_string(mut self, key: &str, value: impl Into<String>) -> Self {
        self.extras
            .insert(key.to_string(), Extra::String(value.into()));
        self
    }

    pub fn put_int(mut self, key: &str, value: i32) -> Self {
        self.extras.insert(key.to_string(), Extra::Int(value));
        self
    }

    pub fn put_long(mut self, key: &str, value: i64) -> Self {
        self.extras.insert(key.to_string(), Extra::Long(value));
        self
    }

    pub fn extra(&self, key: &str) -> Option<&Extra> {
        self.extras.get(key)
    }

    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> anyhow::Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| anyhow::anyhow!("Invalid intent datagram: {}", e))
    }
}

impl std::fmt::Display for Extra {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Extra::Int(v) => write!(f, "{}", v),
            Extra::Long(v) => write!(f, "{}L", v),
            Extra::String(v) => write!(f, "{:?}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let intent = Intent::new(ACTION_RADIO_ON)
            .put_string("sender", "rebooter")
            .put_string("useCase", "1-1")
            .put_long("onInterval", 300_000);

        let value: serde_json::Value = serde_json::from_slice(&intent.to_bytes().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "action": ACTION_RADIO_ON,
                "extras": {
                    "sender": {"string": "rebooter"},
                    "useCase": {"string": "1-1"},
                    "onInterval": {"long": 300000}
                }
            })
        );
    }

    #[test]
    fn test_extra_types_survive_the_wire() {
        let intent = Intent::new(ACTION_SEND_SMS)
            .put_long("onInterval", 900_000)
            .put_int("expires", 30)
            .put_string("body", "42");

        let decoded = Intent::from_bytes(&intent.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, intent);
        assert_eq!(decoded.extra("onInterval"), Some(&Extra::Long(900_000)));
        assert_eq!(decoded.extra("expires"), Some(&Extra::Int(30)));
    }

    #[test]
    fn test_untyped_extra_is_rejected() {
        let result = Intent::from_bytes(br#"{"action":"x.y.PING","extras":{"n":5}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_without_extras() {
        let intent = Intent::from_bytes(br#"{"action":"x.y.PING"}"#).unwrap();
        assert_eq!(intent.action, "x.y.PING");
        assert!(intent.extras.is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Intent::from_bytes(b"\x02\x00\x01").is_err());
    }

    #[test]
    fn test_later_put_replaces_earlier() {
        let intent = Intent::new(ACTION_SEND_SMS)
            .put_string("body", "first")
            .put_string("body", "second");
        assert_eq!(
            intent.extra("body"),
            Some(&Extra::String("second".to_string()))
        );
    }
}

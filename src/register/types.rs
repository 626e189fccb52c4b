//! Registration payload, errors and results

use serde_json::{Map, Value};
use thiserror::Error;

use crate::platform::Telephony;

const JSON_KEY_PHONE_ID: &str = "id";
const JSON_KEY_SIM_ID: &str = "sim_id";
const JSON_KEY_PHONE_NUMBER: &str = "phone_number";
const JSON_KEY_ASSET_TAG: &str = "asset_tag";
const JSON_KEY_GROUP_NAME: &str = "group_name";

/// Errors raised while building a [`Registrar`](super::Registrar).
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("The asset tag is invalid.")]
    EmptyAssetTag,

    #[error("The group name is invalid.")]
    EmptyGroupName,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors that end a registration attempt.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The server could not be reached, or the exchange broke off
    #[error("Error while communicating with the server: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with something other than 200 OK
    #[error("Got HTTP error ({code}): {message}")]
    Server { code: u16, message: String },

    /// 200 OK, but the body did not report success
    #[error("{0}")]
    Protocol(String),
}

/// Outcome of a single registration attempt, as reported to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationResult {
    Success,
    NetworkError(String),
    ServerError { code: u16, message: String },
    ProtocolError(String),
}

impl RegistrationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RegistrationResult::Success)
    }

    /// One-line message for the person holding the device
    pub fn summary(&self) -> &'static str {
        if self.is_success() {
            "Registration succeeded."
        } else {
            "Registration failed."
        }
    }
}

impl From<Result<(), RegistrationError>> for RegistrationResult {
    fn from(result: Result<(), RegistrationError>) -> Self {
        match result {
            Ok(()) => RegistrationResult::Success,
            Err(RegistrationError::Network(e)) => RegistrationResult::NetworkError(e.to_string()),
            Err(RegistrationError::Server { code, message }) => {
                RegistrationResult::ServerError { code, message }
            }
            Err(RegistrationError::Protocol(detail)) => RegistrationResult::ProtocolError(detail),
        }
    }
}

/// Everything the server learns about the device at registration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInfo {
    pub device_id: Option<String>,
    pub sim_id: Option<String>,
    pub phone_number: Option<String>,
    pub asset_tag: String,
    pub group_name: String,
}

impl RegistrationInfo {
    /// Snapshot the telephony identifiers as they are right now
    pub fn collect(telephony: &impl Telephony, asset_tag: &str, group_name: &str) -> Self {
        Self {
            device_id: telephony.device_id(),
            sim_id: telephony.sim_id(),
            phone_number: telephony.phone_number(),
            asset_tag: asset_tag.to_string(),
            group_name: group_name.to_string(),
        }
    }

    /// JSON object sent as the `info` form field. Unavailable identifiers
    /// are left out rather than sent as `null`.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        let optional = [
            (JSON_KEY_PHONE_ID, &self.device_id),
            (JSON_KEY_SIM_ID, &self.sim_id),
            (JSON_KEY_PHONE_NUMBER, &self.phone_number),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                object.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        object.insert(
            JSON_KEY_ASSET_TAG.to_string(),
            Value::String(self.asset_tag.clone()),
        );
        object.insert(
            JSON_KEY_GROUP_NAME.to_string(),
            Value::String(self.group_name.clone()),
        );
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_payload() {
        let info = RegistrationInfo {
            device_id: Some("356938035643809".to_string()),
            sim_id: Some("8901260222784539210".to_string()),
            phone_number: Some("+15555550100".to_string()),
            asset_tag: "A-0042".to_string(),
            group_name: "clinic-north".to_string(),
        };

        assert_eq!(
            info.to_json(),
            json!({
                "id": "356938035643809",
                "sim_id": "8901260222784539210",
                "phone_number": "+15555550100",
                "asset_tag": "A-0042",
                "group_name": "clinic-north",
            })
        );
    }

    #[test]
    fn test_missing_identifiers_are_omitted() {
        let info = RegistrationInfo {
            device_id: Some("356938035643809".to_string()),
            sim_id: None,
            phone_number: None,
            asset_tag: "A-0042".to_string(),
            group_name: "clinic-north".to_string(),
        };

        let value = info.to_json();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert!(!object.contains_key("sim_id"));
        assert!(!object.contains_key("phone_number"));
    }

    #[test]
    fn test_result_summary() {
        assert_eq!(RegistrationResult::Success.summary(), "Registration succeeded.");
        let failed = RegistrationResult::from(Err(RegistrationError::Server {
            code: 503,
            message: "Service Unavailable".to_string(),
        }));
        assert_eq!(
            failed,
            RegistrationResult::ServerError {
                code: 503,
                message: "Service Unavailable".to_string()
            }
        );
        assert_eq!(failed.summary(), "Registration failed.");
    }
}

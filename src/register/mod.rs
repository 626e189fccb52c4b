//! Device registration
//!
//! Registers this device with the update server by posting the device's
//! identifiers together with its operator-assigned asset tag and group:
//!
//! 1. Read device id, SIM id and line-1 number from telephony
//! 2. POST `info=<url-encoded JSON>` to the registration endpoint
//! 3. Require `200 OK` and a JSON body with `"result": "success"`
//!
//! A single attempt is made; retrying is up to the caller.

pub mod types;

use hyper::ext::ReasonPhrase;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::config::RegistrationConfig;
use crate::platform::Telephony;
pub use types::{ConfigurationError, RegistrationError, RegistrationInfo, RegistrationResult};

pub const DEFAULT_SERVER_URL: &str = "http://systemsens.cens.ucla.edu/updates/updater/register/";

const HTTP_KEY_DATA: &str = "info";
const JSON_KEY_RESULT: &str = "result";
const JSON_VALUE_SUCCESS: &str = "success";

pub struct Registrar<T> {
    telephony: T,
    asset_tag: String,
    group_name: String,
    server_url: String,
    http: Client,
}

impl<T: Telephony> Registrar<T> {
    /// Create a registrar for one device. Fails if the asset tag or group
    /// name is empty.
    pub fn new(
        telephony: T,
        asset_tag: &str,
        group_name: &str,
        config: &RegistrationConfig,
    ) -> Result<Self, ConfigurationError> {
        if asset_tag.is_empty() {
            return Err(ConfigurationError::EmptyAssetTag);
        }
        if group_name.is_empty() {
            return Err(ConfigurationError::EmptyGroupName);
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ConfigurationError::HttpClient)?;

        info!("Creating registrar for asset {} in group {}", asset_tag, group_name);

        Ok(Self {
            telephony,
            asset_tag: asset_tag.to_string(),
            group_name: group_name.to_string(),
            server_url: config.server_url.clone(),
            http,
        })
    }

    /// Register with the server and report the outcome.
    pub async fn register(&self) -> RegistrationResult {
        info!("Beginning the registration");
        let result = self.try_register().await;
        match &result {
            Ok(()) => info!("Registration was successful"),
            Err(e @ RegistrationError::Network(_)) => {
                error!("Error while communicating with the server: {:#}", e)
            }
            Err(e) => error!("Registration rejected: {}", e),
        }
        RegistrationResult::from(result)
    }

    /// Post the device info and check the server's verdict
    #[instrument(skip_all, fields(url = %self.server_url))]
    pub async fn try_register(&self) -> Result<(), RegistrationError> {
        let info = RegistrationInfo::collect(&self.telephony, &self.asset_tag, &self.group_name);
        let payload = info.to_json().to_string();
        debug!("Posting device info: {}", payload);

        let response = self
            .http
            .post(&self.server_url)
            .form(&[(HTTP_KEY_DATA, payload.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RegistrationError::Server {
                code: status.as_u16(),
                message: reason_phrase(&response),
            });
        }

        let body = response.text().await?;
        check_reply(&body)
    }
}

/// The reason phrase the server sent. The HTTP stack only records it when
/// it differs from the standard one for the status code.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

/// The body of a 200 response must be a JSON object whose `result` is
/// the string `"success"`. Other fields are ignored.
fn check_reply(body: &str) -> Result<(), RegistrationError> {
    let reply: Value = serde_json::from_str(body).map_err(|_| {
        RegistrationError::Protocol(format!(
            "The server returned a success HTTP response code, but the actual response is invalid: {}",
            body
        ))
    })?;

    match reply.get(JSON_KEY_RESULT) {
        Some(Value::String(result)) if result == JSON_VALUE_SUCCESS => Ok(()),
        Some(Value::String(result)) => Err(RegistrationError::Protocol(format!(
            "There was an error with the upload: {}",
            result
        ))),
        Some(other) => Err(RegistrationError::Protocol(format!(
            "Unexpected result value: {}",
            other
        ))),
        None => Err(RegistrationError::Protocol(format!(
            "The server response has no result: {}",
            body
        ))),
    }
}

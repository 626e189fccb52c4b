//! Telephony adapter backed by configuration
//!
//! Off-handset there is no modem to ask, so the identifiers an operator
//! would read from the device are provisioned in `[telephony]`.

use super::Telephony;
use crate::config::TelephonyConfig;

#[derive(Debug, Clone, Default)]
pub struct StaticTelephony {
    device_id: Option<String>,
    sim_id: Option<String>,
    phone_number: Option<String>,
}

impl StaticTelephony {
    pub fn new(config: &TelephonyConfig) -> Self {
        Self {
            device_id: non_blank(&config.device_id),
            sim_id: non_blank(&config.sim_id),
            phone_number: non_blank(&config.phone_number),
        }
    }
}

impl Telephony for StaticTelephony {
    fn device_id(&self) -> Option<String> {
        self.device_id.clone()
    }

    fn sim_id(&self) -> Option<String> {
        self.sim_id.clone()
    }

    fn phone_number(&self) -> Option<String> {
        self.phone_number.clone()
    }
}

// An empty string in the config file means "not available"
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

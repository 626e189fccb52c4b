//! Radio-control request messages and wait results

use crate::broadcast::intent::{Intent, ACTION_RADIO_ON, ACTION_SEND_SMS};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Request to bring the radio up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioRequest {
    /// Application name of the requester
    pub sender: String,
    /// Use-case id, e.g. "1-1" for the rebooter's test SMS
    pub use_case: String,
    /// Minutes before the radio may be switched off again; 0 = component default
    pub on_interval_minutes: u32,
}

impl RadioRequest {
    pub fn to_intent(&self) -> Intent {
        let intent = Intent::new(ACTION_RADIO_ON)
            .put_string("sender", &self.sender)
            .put_string("useCase", &self.use_case);

        if self.on_interval_minutes == 0 {
            intent
        } else {
            intent.put_long(
                "onInterval",
                i64::from(self.on_interval_minutes) * MILLIS_PER_MINUTE,
            )
        }
    }
}

/// Request to send a text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsRequest {
    pub sender: String,
    pub use_case: String,
    pub phone_number: String,
    pub body: String,
    /// Minutes after which the request is dropped instead of retried
    pub expires_minutes: i32,
}

impl SmsRequest {
    pub fn to_intent(&self) -> Intent {
        Intent::new(ACTION_SEND_SMS)
            .put_string("sender", &self.sender)
            .put_string("useCase", &self.use_case)
            .put_string("phoneNumber", &self.phone_number)
            .put_string("body", &self.body)
            .put_int("expires", self.expires_minutes)
    }
}

/// Why a radio wait stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Confirmed,
    TimedOut,
    Interrupted { radio_on: bool },
}

impl WaitOutcome {
    /// Collapse to the radio state the caller ends up with
    pub fn radio_on(self) -> bool {
        match self {
            WaitOutcome::Confirmed => true,
            WaitOutcome::TimedOut => false,
            WaitOutcome::Interrupted { radio_on } => radio_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::intent::Extra;

    #[test]
    fn test_zero_interval_omits_extra() {
        let intent = RadioRequest {
            sender: "rebooter".to_string(),
            use_case: "1-1".to_string(),
            on_interval_minutes: 0,
        }
        .to_intent();

        assert_eq!(intent.action, ACTION_RADIO_ON);
        assert_eq!(intent.extras.len(), 2);
        assert!(intent.extra("onInterval").is_none());
    }

    #[test]
    fn test_large_interval_does_not_overflow() {
        let intent = RadioRequest {
            sender: "s".to_string(),
            use_case: "u".to_string(),
            on_interval_minutes: u32::MAX,
        }
        .to_intent();

        assert_eq!(
            intent.extra("onInterval"),
            Some(&Extra::Long(i64::from(u32::MAX) * 60_000))
        );
    }

    #[test]
    fn test_interrupted_outcome_keeps_radio_state() {
        assert!(WaitOutcome::Interrupted { radio_on: true }.radio_on());
        assert!(!WaitOutcome::Interrupted { radio_on: false }.radio_on());
        assert!(!WaitOutcome::TimedOut.radio_on());
    }
}

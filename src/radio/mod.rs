//! Radio (connectivity) coordination
//!
//! The agent does not switch the radio itself. It broadcasts requests to a
//! separate radio-control component and, when asked to, polls connectivity
//! until the radio comes up or the wait times out.
//!
//! ## Request-and-wait flow
//! 1. Broadcast `ACTION_RADIO_ON` (always, even if the radio is already on)
//! 2. Sample connectivity; if on, done
//! 3. If the caller blocks, poll every `poll_interval` until connectivity
//!    shows up, `wait_timeout` elapses, or the caller's interrupt fires

pub mod types;

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::broadcast::intent::Intent;
use crate::config::RadioConfig;
use crate::platform::{Broadcaster, Connectivity};
pub use types::{RadioRequest, SmsRequest, WaitOutcome};

/// How long a blocking radio-on request waits before giving up
pub const DEFAULT_WAIT_RADIO_ON: Duration = Duration::from_secs(60);

/// Connectivity sampling period while waiting
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct RadioCoordinator<C, B> {
    connectivity: C,
    broadcaster: B,
    poll_interval: Duration,
    wait_timeout: Duration,
}

impl<C: Connectivity, B: Broadcaster> RadioCoordinator<C, B> {
    pub fn new(connectivity: C, broadcaster: B) -> Self {
        Self {
            connectivity,
            broadcaster,
            poll_interval: DEFAULT_POLL_INTERVAL,
            wait_timeout: DEFAULT_WAIT_RADIO_ON,
        }
    }

    pub fn with_config(connectivity: C, broadcaster: B, config: &RadioConfig) -> Self {
        Self::new(connectivity, broadcaster)
            .with_timing(config.poll_interval(), config.wait_timeout())
    }

    /// Override the poll period and the wait timeout. A zero poll interval
    /// falls back to [`DEFAULT_POLL_INTERVAL`].
    pub fn with_timing(mut self, poll_interval: Duration, wait_timeout: Duration) -> Self {
        self.poll_interval = if poll_interval.is_zero() {
            warn!(
                "Zero radio poll interval, using {:?}",
                DEFAULT_POLL_INTERVAL
            );
            DEFAULT_POLL_INTERVAL
        } else {
            poll_interval
        };
        self.wait_timeout = wait_timeout;
        self
    }

    /// Current radio state, straight from the connectivity port
    pub fn is_radio_on(&self) -> bool {
        let on = self.connectivity.has_active_network();
        debug!("is_radio_on: returning {}", on);
        on
    }

    /// Ask for the radio to be turned on.
    ///
    /// `on_interval_minutes` is how long the radio-control component should
    /// keep the radio up before switching it off again; 0 leaves that to the
    /// component's default. Returns whether the radio is on when this call
    /// finishes.
    pub async fn request_radio_on(
        &self,
        sender: &str,
        use_case: &str,
        block: bool,
        on_interval_minutes: u32,
    ) -> bool {
        self.request_radio_on_until(
            sender,
            use_case,
            block,
            on_interval_minutes,
            std::future::pending(),
        )
        .await
    }

    /// Like [`request_radio_on`](Self::request_radio_on), but a blocking wait
    /// ends early when `interrupt` completes.
    pub async fn request_radio_on_until(
        &self,
        sender: &str,
        use_case: &str,
        block: bool,
        on_interval_minutes: u32,
        interrupt: impl Future<Output = ()>,
    ) -> bool {
        let request = RadioRequest {
            sender: sender.to_string(),
            use_case: use_case.to_string(),
            on_interval_minutes,
        };
        debug!("request_radio_on: ACTION_RADIO_ON {}, {}", sender, use_case);
        self.deliver(&request.to_intent()).await;

        if self.is_radio_on() {
            return true;
        }
        if !block {
            return false;
        }

        debug!("Radio off, waiting up to {:?}", self.wait_timeout);
        self.wait_outcome(interrupt).await.radio_on()
    }

    /// Block until the radio is on or the wait times out
    pub async fn wait_for_radio_on(&self) -> bool {
        self.wait_outcome(std::future::pending()).await.radio_on()
    }

    /// Block until the radio is on, the wait times out, or `interrupt`
    /// completes. An interrupted wait reports the radio state at that moment.
    pub async fn wait_for_radio_on_until(&self, interrupt: impl Future<Output = ()>) -> bool {
        self.wait_outcome(interrupt).await.radio_on()
    }

    /// The polling loop, with the reason it stopped
    pub async fn wait_outcome(&self, interrupt: impl Future<Output = ()>) -> WaitOutcome {
        tokio::pin!(interrupt);
        let start = Instant::now();

        loop {
            if self.connectivity.has_active_network() {
                info!(
                    "wait_for_radio_on: radio turned on after {} ms",
                    start.elapsed().as_millis()
                );
                return WaitOutcome::Confirmed;
            }

            tokio::select! {
                _ = &mut interrupt => {
                    let radio_on = self.is_radio_on();
                    warn!(
                        "wait_for_radio_on: interrupted after {} ms (radio on: {})",
                        start.elapsed().as_millis(),
                        radio_on
                    );
                    return WaitOutcome::Interrupted { radio_on };
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }

            if start.elapsed() > self.wait_timeout {
                warn!(
                    "wait_for_radio_on: timed out after {} ms",
                    start.elapsed().as_millis()
                );
                break;
            }
        }

        // The radio may have come up during the last sleep
        if self.is_radio_on() {
            WaitOutcome::Confirmed
        } else {
            WaitOutcome::TimedOut
        }
    }

    /// Ask the radio-control component to send an SMS.
    /// `expires_minutes` bounds how long it keeps retrying.
    pub async fn request_send_sms(
        &self,
        sender: &str,
        use_case: &str,
        phone_number: &str,
        body: &str,
        expires_minutes: i32,
    ) {
        let request = SmsRequest {
            sender: sender.to_string(),
            use_case: use_case.to_string(),
            phone_number: phone_number.to_string(),
            body: body.to_string(),
            expires_minutes,
        };
        debug!("request_send_sms: ACTION_SEND_SMS {}, {}", sender, use_case);
        self.deliver(&request.to_intent()).await;
    }

    // Broadcasts are unconfirmed; a local send failure is only worth a log line
    async fn deliver(&self, intent: &Intent) {
        if let Err(e) = self.broadcaster.send_broadcast(intent).await {
            warn!("Broadcast {} was not sent: {:#}", intent.action, e);
        }
    }
}

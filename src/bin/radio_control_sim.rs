//! Radio-control simulator
//!
//! Stands in for the component that owns the radio: listens for intent
//! datagrams from `cens-updater` and logs each request. Useful for testing
//! without a handset.
//!
//! Usage: cargo run --bin radio-control-sim [bind_addr]

use cens_updater::broadcast::intent::{Extra, Intent, ACTION_RADIO_ON, ACTION_SEND_SMS};
use std::env;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let bind_addr = env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:7370".to_string());

    let socket = UdpSocket::bind(&bind_addr).await?;
    info!("Radio-control simulator listening on {}", bind_addr);

    let mut buf = vec![0u8; 65535];

    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => {
                let (len, src) = received?;
                debug!("Received {} bytes from {}", len, src);

                match Intent::from_bytes(&buf[..len]) {
                    Ok(intent) => describe(&intent),
                    Err(e) => warn!("Dropping datagram from {}: {}", src, e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                return Ok(());
            }
        }
    }
}

fn describe(intent: &Intent) {
    let received_at = chrono::Utc::now();
    match intent.action.as_str() {
        ACTION_RADIO_ON => {
            let off_after = match intent.extra("onInterval") {
                Some(Extra::Long(ms)) => format!("{} ms", ms),
                _ => "default delay".to_string(),
            };
            info!(
                "[{}] RADIO_ON from {} (use case {}), off after {}",
                received_at.to_rfc3339(),
                string_extra(intent, "sender"),
                string_extra(intent, "useCase"),
                off_after
            );
        }
        ACTION_SEND_SMS => {
            info!(
                "[{}] SEND_SMS from {} (use case {}) to {}, expires in {} min: {}",
                received_at.to_rfc3339(),
                string_extra(intent, "sender"),
                string_extra(intent, "useCase"),
                string_extra(intent, "phoneNumber"),
                intent
                    .extra("expires")
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "?".to_string()),
                string_extra(intent, "body")
            );
        }
        other => {
            info!("[{}] Unhandled action {}", received_at.to_rfc3339(), other);
            for (key, value) in &intent.extras {
                info!("  {} = {}", key, value);
            }
        }
    }
}

fn string_extra<'a>(intent: &'a Intent, key: &str) -> &'a str {
    match intent.extra(key) {
        Some(Extra::String(value)) => value,
        _ => "?",
    }
}

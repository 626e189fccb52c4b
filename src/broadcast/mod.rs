pub mod intent;

use anyhow::Context;
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::config::BroadcastConfig;
use crate::platform::Broadcaster;
use intent::Intent;

/// Delivers intents as JSON datagrams to the radio-control listener.
///
/// UDP gives exactly the guarantees a platform broadcast does: the datagram
/// leaves the socket and nobody tells us whether it arrived.
pub struct UdpBroadcaster {
    socket: UdpSocket,
    target: String,
}

impl UdpBroadcaster {
    pub async fn bind(config: &BroadcastConfig) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .context("failed to bind broadcast socket")?;
        info!("Broadcasting intents to {}", config.target);

        Ok(Self {
            socket,
            target: config.target.clone(),
        })
    }
}

impl Broadcaster for UdpBroadcaster {
    async fn send_broadcast(&self, intent: &Intent) -> anyhow::Result<()> {
        let datagram = intent.to_bytes()?;
        let sent = self
            .socket
            .send_to(&datagram, self.target.as_str())
            .await
            .with_context(|| format!("failed to send {} to {}", intent.action, self.target))?;
        debug!("Sent {} ({} bytes) to {}", intent.action, sent, self.target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intent::{Extra, ACTION_SEND_SMS};
    use std::time::Duration;

    #[tokio::test]
    async fn test_intent_arrives_as_datagram() {
        let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let config = BroadcastConfig {
            target: listener.local_addr().unwrap().to_string(),
        };

        let broadcaster = UdpBroadcaster::bind(&config).await.unwrap();
        let intent = Intent::new(ACTION_SEND_SMS)
            .put_string("phoneNumber", "+15555550100")
            .put_int("expires", 30);
        broadcaster.send_broadcast(&intent).await.unwrap();

        let mut buf = [0u8; 2048];
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), listener.recv_from(&mut buf))
            .await
            .expect("no datagram received")
            .unwrap();

        let received = Intent::from_bytes(&buf[..len]).unwrap();
        assert_eq!(received.action, ACTION_SEND_SMS);
        assert_eq!(received.extra("expires"), Some(&Extra::Int(30)));
    }

    #[tokio::test]
    async fn test_unresolvable_target_is_an_error() {
        let config = BroadcastConfig {
            target: "not-an-address".to_string(),
        };
        let broadcaster = UdpBroadcaster::bind(&config).await.unwrap();
        let result = broadcaster
            .send_broadcast(&Intent::new(ACTION_SEND_SMS))
            .await;
        assert!(result.is_err());
    }
}

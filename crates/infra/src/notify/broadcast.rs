//! Broadcast-channel notifier
//!
//! Fans every published event out to all live subscribers (display
//! gateways, websocket bridges). Publishing never blocks: a lagging
//! subscriber loses the oldest envelopes and sees `RecvError::Lagged`.

use fids_core::Notifier;
use fids_domain::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

/// Envelopes buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// One published event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    /// Topic the event was published on.
    pub topic: String,
    /// Event payload.
    pub payload: Value,
}

/// [`Notifier`] backed by a `tokio::sync::broadcast` channel.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<NotificationEnvelope>,
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl BroadcastNotifier {
    /// # Panics
    /// Panics if `capacity` is zero, as `tokio::sync::broadcast` does.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// New receiver that sees every envelope published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEnvelope> {
        self.sender.subscribe()
    }

    /// Number of live receivers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Notifier for BroadcastNotifier {
    fn publish(&self, topic: &str, payload: Value) -> Result<()> {
        let envelope = NotificationEnvelope { topic: topic.to_string(), payload };
        match self.sender.send(envelope) {
            Ok(receivers) => debug!(topic, receivers, "notifier.published"),
            // No subscribers is not a failure for a best-effort channel.
            Err(_) => debug!(topic, "notifier.no_subscribers"),
        }
        Ok(())
    }
}

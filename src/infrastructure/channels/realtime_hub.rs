use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::application::ports::{BroadcastChannel, BroadcastError, Broadcaster};

/// A message published to connected realtime clients.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub channel: BroadcastChannel,
    pub payload: serde_json::Value,
}

/// In-process realtime hub backed by a single broadcast channel. Each
/// websocket connection subscribes and filters for its own user channel
/// (plus the office channel for office actors). Slow subscribers lag and
/// lose messages rather than applying backpressure.
pub struct RealtimeHub {
    sender: broadcast::Sender<OutboundMessage>,
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OutboundMessage> {
        self.sender.subscribe()
    }

    pub fn connected_clients(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl Broadcaster for RealtimeHub {
    async fn publish(
        &self,
        channel: BroadcastChannel,
        payload: serde_json::Value,
    ) -> Result<(), BroadcastError> {
        // A send error only means nobody is connected right now.
        if self
            .sender
            .send(OutboundMessage { channel, payload })
            .is_err()
        {
            tracing::debug!("No realtime subscribers connected, message dropped");
        }
        Ok(())
    }
}

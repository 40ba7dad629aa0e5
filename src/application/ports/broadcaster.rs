use async_trait::async_trait;

use crate::domain::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastChannel {
    /// Delivered to one user's connected clients.
    User(UserId),
    /// Delivered to every connected office client.
    Office,
}

#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error("broadcast failed: {0}")]
    Failed(String),
}

/// Realtime delivery to connected clients. Lossy: a failed or missed
/// delivery is logged by the caller and abandoned.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn publish(
        &self,
        channel: BroadcastChannel,
        payload: serde_json::Value,
    ) -> Result<(), BroadcastError>;
}

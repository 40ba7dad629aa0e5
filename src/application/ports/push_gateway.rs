use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("push dispatch failed: {0}")]
    DispatchFailed(String),
}

/// Mobile push delivery. One call sends a single message to a batch of
/// device tokens; failures are logged by the caller and abandoned.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: &serde_json::Value,
    ) -> Result<(), PushError>;
}

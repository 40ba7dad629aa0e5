use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use crate::application::ports::{PushError, PushGateway};

#[derive(Serialize)]
struct PushRequest<'a> {
    registration_tokens: &'a [String],
    title: &'a str,
    body: &'a str,
    data: &'a serde_json::Value,
}

/// HTTP client for the mobile-push gateway. One request per token batch.
pub struct HttpPushGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpPushGateway {
    pub fn new(endpoint: String, api_key: String) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PushError::DispatchFailed(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    #[instrument(skip(self, tokens, title, body, data), fields(batch = tokens.len()))]
    async fn send(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: &serde_json::Value,
    ) -> Result<(), PushError> {
        let request = PushRequest {
            registration_tokens: tokens,
            title,
            body,
            data,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PushError::DispatchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PushError::DispatchFailed(format!(
                "gateway returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Used when no push gateway is configured.
pub struct NoopPushGateway;

#[async_trait]
impl PushGateway for NoopPushGateway {
    async fn send(
        &self,
        tokens: &[String],
        _title: &str,
        _body: &str,
        _data: &serde_json::Value,
    ) -> Result<(), PushError> {
        tracing::debug!(batch = tokens.len(), "Push gateway disabled, batch dropped");
        Ok(())
    }
}

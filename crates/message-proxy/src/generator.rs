//! The seam between the proxy and the network.

use crate::error::TransportError;
use crate::upstream::{ApiKey, GenerateRequest, UpstreamConfig};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Raw upstream answer. Interpretation is left to the proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    /// Reason phrase for `status`, used when the body has no usable message.
    pub status_text: String,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one generation request upstream.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        key: &ApiKey,
        request: &GenerateRequest,
    ) -> Result<UpstreamReply, TransportError>;
}

/// `Generator` backed by reqwest. No retries and no timeout.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Generator for GeminiClient {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn generate(
        &self,
        key: &ApiKey,
        request: &GenerateRequest,
    ) -> Result<UpstreamReply, TransportError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", key.expose())])
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(e.without_url().to_string()))?;
        debug!(status = status.as_u16(), bytes = body.len(), "Upstream replied");

        Ok(UpstreamReply {
            status: status.as_u16(),
            status_text: status_text(status),
            body,
        })
    }
}

/// Reason phrase, or the bare code for statuses without one.
fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}

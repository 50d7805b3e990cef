use super::typewriter::Typewriter;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Shown for any failed request; raw error detail never reaches the reader.
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again later.";
/// Shown when the proxy answered successfully but without a message.
pub const RETRY_FALLBACK: &str = "Could not generate the message. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageClientError {
    #[error("A message is already being generated")]
    Busy,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

/// Requests love messages from the proxy route.
///
/// Clones share one in-flight flag, so a second request made while the first
/// is outstanding returns [`MessageClientError::Busy`] at once instead of
/// issuing another call.
#[derive(Debug, Clone)]
pub struct MessageClient {
    http: reqwest::Client,
    url: String,
    in_flight: Arc<AtomicBool>,
}

/// Clears the in-flight flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl MessageClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlight<'_>, MessageClientError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(&self.in_flight))
            .map_err(|_| MessageClientError::Busy)
    }

    /// Fetches one message. Failures come back as displayable fallback text.
    #[instrument(skip(self))]
    pub async fn request_message(&self) -> Result<String, MessageClientError> {
        let _guard = self.begin()?;
        Ok(self.fetch_text().await)
    }

    /// Fetches one message and reveals it through `typewriter`, holding the
    /// in-flight flag until the last character is rendered.
    #[instrument(skip(self, typewriter, render))]
    pub async fn show_message<F>(
        &self,
        typewriter: &Typewriter,
        render: F,
    ) -> Result<String, MessageClientError>
    where
        F: FnMut(&str),
    {
        let _guard = self.begin()?;
        let text = self.fetch_text().await;
        typewriter.type_out(&text, render).await;
        Ok(text)
    }

    async fn fetch_text(&self) -> String {
        debug!(url = %self.url, "Requesting message");
        let response = match self.http.get(&self.url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Message request failed");
                return APOLOGY.to_string();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Message request rejected");
            return APOLOGY.to_string();
        }

        match response.json::<MessageBody>().await {
            Ok(MessageBody {
                message: Some(message),
            }) if !message.is_empty() => {
                info!(chars = message.chars().count(), "Message received");
                message
            }
            Ok(_) => RETRY_FALLBACK.to_string(),
            Err(e) => {
                warn!(error = %e, "Unreadable message body");
                APOLOGY.to_string()
            }
        }
    }
}

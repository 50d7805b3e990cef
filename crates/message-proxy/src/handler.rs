//! # Message Proxy
//!
//! Turns one inbound trigger into at most one upstream call and exactly one
//! answer. The proxy holds no mutable state: concurrent requests are
//! independent and each one issues its own upstream call.
//!
//! ## Outcomes
//!
//! | Situation                                | Status           | Body                 |
//! |------------------------------------------|------------------|----------------------|
//! | method is not `GET`                      | 405, `Allow: GET`| `{error}`            |
//! | no API key configured                    | 500              | `{error}`            |
//! | upstream non-2xx                         | upstream status  | `{error}` with reason|
//! | upstream 2xx without text                | 500              | `{error}`            |
//! | transport failure                        | 500              | `{error}` (generic)  |
//! | upstream 2xx with text                   | 200              | `{message}`          |

use crate::error::ProxyError;
use crate::generator::Generator;
use crate::upstream::{upstream_error_message, ApiKey, GenerateRequest, GenerateResponse};
use axum::http::{Method, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// JSON body of every proxy answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProxyBody {
    Message { message: String },
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: ProxyBody,
    /// Value for the `Allow` header, set only on 405.
    pub allow: Option<&'static str>,
}

impl ProxyResponse {
    fn message(message: String) -> Self {
        Self {
            status: StatusCode::OK,
            body: ProxyBody::Message { message },
            allow: None,
        }
    }

    fn error(status: StatusCode, error: String) -> Self {
        Self {
            status,
            body: ProxyBody::Error { error },
            allow: None,
        }
    }

    fn method_not_allowed() -> Self {
        Self {
            allow: Some("GET"),
            ..Self::error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
        }
    }
}

pub struct MessageProxy {
    generator: Arc<dyn Generator>,
    api_key: Option<ApiKey>,
    request: GenerateRequest,
}

impl MessageProxy {
    pub fn new(generator: Arc<dyn Generator>, api_key: Option<ApiKey>, prompt: &str) -> Self {
        if api_key.is_none() {
            warn!("No API key configured; every generation request will fail");
        }
        Self {
            generator,
            api_key,
            request: GenerateRequest::from_prompt(prompt),
        }
    }

    /// Full request handling, method check included.
    pub async fn handle(&self, method: &Method) -> ProxyResponse {
        if *method != Method::GET {
            debug!(%method, "Rejected method");
            return ProxyResponse::method_not_allowed();
        }
        match self.generate().await {
            Ok(message) => ProxyResponse::message(message),
            Err(e) => ProxyResponse::error(e.status(), e.to_string()),
        }
    }

    /// One upstream round trip, returning the generated text.
    #[instrument(skip(self))]
    pub async fn generate(&self) -> Result<String, ProxyError> {
        let Some(key) = self.api_key.as_ref() else {
            error!("API key is not configured");
            return Err(ProxyError::MissingCredential);
        };

        let reply = self.generator.generate(key, &self.request).await.map_err(|e| {
            error!(error = %e, "Upstream call failed");
            ProxyError::from(e)
        })?;

        if !reply.is_success() {
            error!(status = reply.status, body = %reply.body, "Upstream returned an error");
            return Err(ProxyError::Upstream {
                status: reply.status,
                message: upstream_error_message(&reply.body, &reply.status_text),
            });
        }

        let parsed: GenerateResponse = match serde_json::from_str(&reply.body) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(error = %e, body = %reply.body, "Unreadable upstream payload");
                return Err(ProxyError::EmptyResult);
            }
        };
        match parsed.text() {
            Some(text) => {
                info!(chars = text.chars().count(), "Message generated");
                Ok(text.to_string())
            }
            None => {
                error!(body = %reply.body, "Unexpected upstream payload");
                Err(ProxyError::EmptyResult)
            }
        }
    }
}

//! # Proxy Errors
//!
//! Every way a generation request can end without text. All of them are
//! terminal for the request; nothing is retried.
//!
//! The `Display` text of each variant is what the caller sees in the
//! `{error}` body, so it must never carry the credential or raw transport
//! detail.

use axum::http::StatusCode;

/// A failed network exchange with the upstream API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// No API key in the process configuration. No upstream call is made.
    #[error("The API key is not configured on the server.")]
    MissingCredential,

    /// The upstream answered with a non-success status.
    #[error("Google API error: {message}")]
    Upstream { status: u16, message: String },

    /// The upstream answered 2xx but carried no text at the expected path.
    #[error("Could not generate the message. The API response was empty.")]
    EmptyResult,

    /// The exchange itself failed; detail stays in the logs.
    #[error("Internal server error.")]
    Transport(#[from] TransportError),
}

impl ProxyError {
    /// HTTP status to answer with. Upstream statuses are relayed as-is.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::MissingCredential | ProxyError::EmptyResult | ProxyError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

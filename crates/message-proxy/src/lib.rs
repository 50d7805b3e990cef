//! # Message Proxy
//!
//! A stateless HTTP endpoint that asks a generative text API for a short love
//! message with a fixed prompt and relays the text, keeping the API key on
//! the server.
//!
//! ## Layers
//!
//! 1. **Wire** ([`upstream`]) - request/response shapes and the credential.
//! 2. **Transport** ([`Generator`]) - one upstream POST; [`GeminiClient`] in
//!    production, [`mock::MockGenerator`] in tests.
//! 3. **Logic** ([`MessageProxy`]) - method check, credential check, result
//!    interpretation, error mapping.
//! 4. **Surface** ([`server`]) - the axum router and graceful `serve`.

pub mod error;
pub mod generator;
pub mod handler;
pub mod mock;
pub mod server;
pub mod upstream;

pub use error::{ProxyError, TransportError};
pub use generator::{GeminiClient, Generator, UpstreamReply};
pub use handler::{MessageProxy, ProxyBody, ProxyResponse};
pub use server::{router, serve, ROUTE};
pub use upstream::{ApiKey, GenerateRequest, GenerateResponse, UpstreamConfig};

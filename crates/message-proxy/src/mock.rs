//! # Mock Generator
//!
//! A [`Generator`] that replays queued replies instead of touching the
//! network, in the same expectation-queue style as the scene's test doubles.
//!
//! ```rust
//! use message_proxy::mock::MockGenerator;
//!
//! let mock = MockGenerator::new();
//! mock.expect_send().return_text("Hello, love");
//! mock.expect_send().return_reply(429, r#"{"error":{"message":"slow down"}}"#);
//! mock.expect_send().return_transport_err("connection reset");
//!
//! // Hand `mock.clone()` to a MessageProxy, exercise it, then:
//! // mock.verify();
//! ```

use crate::error::TransportError;
use crate::generator::{Generator, UpstreamReply};
use crate::upstream::{ApiKey, GenerateRequest};
use async_trait::async_trait;
use axum::http::StatusCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Expectation {
    Reply(UpstreamReply),
    Transport(String),
}

/// Clones share one queue and one call counter.
#[derive(Clone, Default)]
pub struct MockGenerator {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    calls: Arc<AtomicUsize>,
    delay: Duration,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn expect_send(&self) -> SendExpectationBuilder {
        SendExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Number of `generate` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(
        &self,
        _key: &ApiKey,
        _request: &GenerateRequest,
    ) -> Result<UpstreamReply, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let expectation = self.expectations.lock().unwrap().pop_front();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match expectation {
            Some(Expectation::Reply(reply)) => Ok(reply),
            Some(Expectation::Transport(reason)) => Err(TransportError(reason)),
            None => panic!("Unexpected generate call"),
        }
    }
}

/// Builder for one queued reply.
pub struct SendExpectationBuilder {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl SendExpectationBuilder {
    pub fn return_reply(self, status: u16, body: &str) {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        self.push(Expectation::Reply(UpstreamReply {
            status,
            status_text,
            body: body.to_string(),
        }));
    }

    /// A 200 reply carrying `text` at the usual path.
    pub fn return_text(self, text: &str) {
        let body = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        });
        self.return_reply(200, &body.to_string());
    }

    pub fn return_transport_err(self, reason: &str) {
        self.push(Expectation::Transport(reason.to_string()));
    }

    fn push(self, expectation: Expectation) {
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

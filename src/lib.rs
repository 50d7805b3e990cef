//! # Sweetheart
//!
//! > **Hearts on orbit, and a love note on demand.**
//!
//! The application crate that puts the greeting together: a headless orbiting
//! scene ([`orbit_scene`]) and the HTTP proxy that asks a generative API for a
//! short love message ([`message_proxy`]).
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Orchestrator ([`lifecycle`])
//! - **Role**: spins up the scene actor, frame driver, asset loader and server,
//!   and shuts them down together.
//! - **Key items**: [`GreetingSystem`](lifecycle::GreetingSystem),
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 2. Configuration ([`config`])
//! - **Role**: TOML file plus environment overrides; the API key comes from the
//!   environment only.
//! - **Key items**: [`AppConfig`](config::AppConfig).
//!
//! ### 3. The Client Side ([`clients`])
//! - **Role**: requests a message from the proxy with an in-flight guard and
//!   reveals it character by character.
//! - **Key items**: [`MessageClient`](clients::MessageClient),
//!   [`Typewriter`](clients::Typewriter).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! GEMINI_API_KEY=... RUST_LOG=info cargo run -- sweetheart.toml
//! curl http://127.0.0.1:3000/api/generate-message
//! ```

pub mod clients;
pub mod config;
pub mod lifecycle;

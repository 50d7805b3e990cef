//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging for the whole
//! process: the scene actor, the frame driver, the asset loader and the
//! message proxy all log through the same subscriber.
//!
//! ## Configuration
//!
//! Log levels come from `RUST_LOG`. The compact format hides module paths
//! (`with_target(false)`) and shows spans inline.
//!
//! ```bash
//! # Lifecycle only: actor started, pool installed, proxy listening
//! RUST_LOG=info cargo run
//!
//! # Resize/install payloads, asset sizes, upstream statuses
//! RUST_LOG=debug cargo run
//!
//! # Every frame and pointer event
//! RUST_LOG=trace cargo run
//!
//! # Just the proxy
//! RUST_LOG=message_proxy=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Scene**: actor start and shutdown with the frame count, pool install,
//!   rejected installs, a heartbeat from the headless sink.
//! - **Assets**: environment and font sizes, labels skipped for missing fonts.
//! - **Proxy**: listening address, each generation outcome with the upstream
//!   status. The API key never appears; its `Debug` output is redacted.
//!
//! ## Output
//!
//! ```text
//! INFO Scene actor started stars=15000
//! INFO Message proxy listening addr=127.0.0.1:3000 route="/api/generate-message"
//! INFO load_scene_assets{fonts=2}: Scene assets loaded fonts=2
//! INFO Pool installed; scene running frames=41
//! INFO generate: Message generated chars=112
//! ```

/// Initializes the global subscriber. Call once, at the top of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

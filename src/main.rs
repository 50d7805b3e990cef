//! # Sweetheart
//!
//! Runs the greeting: the orbiting scene (headless), and the message proxy on
//! `server.bind`. Stops on Ctrl-C.
//!
//! ```bash
//! GEMINI_API_KEY=... RUST_LOG=info cargo run -- [config.toml]
//! ```

use sweetheart::clients::Typewriter;
use sweetheart::config::AppConfig;
use sweetheart::lifecycle::{setup_tracing, GreetingSystem};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let (config, api_key) = AppConfig::load().map_err(|e| e.to_string())?;
    info!(bind = %config.server.bind, credential = api_key.is_some(), "Starting greeting");

    let system = GreetingSystem::start(&config, api_key)
        .await
        .map_err(|e| e.to_string())?;

    if config.greeting.on_start {
        let typewriter = Typewriter::new(config.greeting.type_delay());
        let span = tracing::info_span!("greeting");
        let shown = async {
            system
                .message_client
                .show_message(&typewriter, |_| {})
                .await
        }
        .instrument(span)
        .await;

        match shown {
            Ok(text) => info!(%text, "Greeting shown"),
            Err(e) => error!(error = %e, "Greeting not shown"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

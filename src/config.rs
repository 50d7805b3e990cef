//! # Configuration
//!
//! [`AppConfig`] is read from an optional TOML file; every field has a default,
//! so an empty file (or none at all) gives the stock scene and proxy.
//!
//! ## Sources, in order
//!
//! 1. Defaults.
//! 2. The TOML file named by the first CLI argument, else `SWEETHEART_CONFIG`.
//! 3. `SWEETHEART_BIND` overrides `server.bind`.
//! 4. `GEMINI_API_KEY` supplies the upstream credential. It is never read from
//!    the file.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [scene]
//! seed = 7
//! fps = 30
//!
//! [scene.pool.hearts]
//! count = 200
//! radius = { min = 10.0, max = 40.0 }
//! speed = { min = -0.004, max = -0.001 }
//! vertical = { min = -40.0, max = 40.0 }
//! scale = { min = 0.15, max = 0.35 }
//! ```

use message_proxy::{ApiKey, UpstreamConfig};
use orbit_scene::{AssetManifest, SceneConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_ENV: &str = "SWEETHEART_CONFIG";
pub const BIND_ENV: &str = "SWEETHEART_BIND";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid bind address {0:?}")]
    InvalidBind(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(self.bind.clone()))
    }
}

/// Client-side message request and reveal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingConfig {
    /// Delay between revealed characters, in milliseconds.
    pub type_delay_ms: u64,
    /// Fetch and type one message right after startup.
    pub on_start: bool,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            type_delay_ms: 50,
            on_start: false,
        }
    }
}

impl GreetingConfig {
    pub fn type_delay(&self) -> Duration {
        Duration::from_millis(self.type_delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub scene: SceneConfig,
    pub assets: AssetManifest,
    pub greeting: GreetingConfig,
}

impl AppConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Resolves the full configuration from `args` (without the program name)
    /// and the given environment.
    pub fn resolve(
        args: &[String],
        env: &HashMap<String, String>,
    ) -> Result<(Self, Option<ApiKey>), ConfigError> {
        let path = args
            .first()
            .cloned()
            .or_else(|| env.get(CONFIG_ENV).cloned())
            .map(PathBuf::from);

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        if let Some(bind) = env.get(BIND_ENV) {
            config.server.bind = bind.clone();
        }
        config.server.addr()?;

        let api_key = env.get(API_KEY_ENV).cloned().and_then(ApiKey::new);
        Ok((config, api_key))
    }

    /// [`resolve`](Self::resolve) against the real process arguments and environment.
    pub fn load() -> Result<(Self, Option<ApiKey>), ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::resolve(&args, &env)
    }
}

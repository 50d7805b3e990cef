//! # Scene Errors
//!
//! Error types shared by the scene actor, its client and the asset loader.
//! The per-frame update itself has no error path; these cover the plumbing
//! around it.

/// Errors raised by the scene actor and its client.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Scene actor closed")]
    ActorClosed,
    #[error("Scene actor dropped response channel")]
    ActorDropped,
    #[error("Scene is already running; the object pool can only be installed once")]
    AlreadyRunning,
    #[error("Invalid scene configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while loading scene assets.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssetError {
    /// The asset could not be fetched.
    #[error("Failed to fetch asset {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The asset was fetched but carried no data.
    #[error("Asset {0} is empty")]
    Empty(String),
}

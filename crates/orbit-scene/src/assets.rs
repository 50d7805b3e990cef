//! # Asset Loading
//!
//! Assets are fetched through an [`AssetSource`] and composed into an immutable
//! [`SceneAssets`] before the scene is allowed to run. The environment map comes
//! first (the pool is only built once lighting is available), then every font
//! face is fetched concurrently.
//!
//! What the bytes mean is the renderer's business: here they are opaque
//! payloads whose only job is to exist.

use crate::decor::FloatingLabel;
use crate::error::{AssetError, SceneError};
use crate::object::build_pool;
use crate::scene::{SceneConfig, SceneContent};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

const ASSET_BASE: &str = "https://rawcdn.githack.com/mrdoob/three.js/dev/examples";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub name: String,
    pub url: String,
}

/// Where to find every asset the scene needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub environment: String,
    pub fonts: Vec<FontSpec>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        let font = |name: &str| FontSpec {
            name: name.to_string(),
            url: format!("{ASSET_BASE}/fonts/{name}.typeface.json"),
        };
        Self {
            environment: format!("{ASSET_BASE}/textures/equirectangular/royal_esplanade_1k.hdr"),
            fonts: vec![font("optimer_bold"), font("gentilis_regular")],
        }
    }
}

/// Loaded lighting texture.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    pub url: String,
    pub data: Arc<[u8]>,
}

/// Loaded font face, addressed by name.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    pub name: String,
    pub data: Arc<[u8]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneAssets {
    pub environment: EnvironmentMap,
    pub fonts: Vec<FontFace>,
}

impl SceneAssets {
    pub fn font(&self, name: &str) -> Option<&FontFace> {
        self.fonts.iter().find(|f| f.name == name)
    }
}

/// Anything that can hand out asset bytes by URL.
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError>;
}

/// Fetches assets over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpAssetSource {
    client: reqwest::Client,
}

impl HttpAssetSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let fail = |reason: String| AssetError::Fetch {
            url: url.to_string(),
            reason,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| fail(e.to_string()))?;
        let bytes = response.bytes().await.map_err(|e| fail(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// In-memory assets with an optional artificial delay per fetch.
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    entries: HashMap<String, Vec<u8>>,
    latency: Duration,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// One small non-empty payload for every URL in `manifest`.
    pub fn placeholder(manifest: &AssetManifest) -> Self {
        let mut assets = Self::new().with(&manifest.environment, b"#?RADIANCE".to_vec());
        for font in &manifest.fonts {
            assets = assets.with(&font.url, br#"{"glyphs":{}}"#.to_vec());
        }
        assets
    }

    pub fn with(mut self, url: &str, data: Vec<u8>) -> Self {
        self.entries.insert(url.to_string(), data);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl AssetSource for StaticAssets {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.entries
            .get(url)
            .cloned()
            .ok_or_else(|| AssetError::Fetch {
                url: url.to_string(),
                reason: "not bundled".to_string(),
            })
    }
}

async fn fetch_non_empty(source: &dyn AssetSource, url: &str) -> Result<Arc<[u8]>, AssetError> {
    let data = source.fetch(url).await?;
    if data.is_empty() {
        return Err(AssetError::Empty(url.to_string()));
    }
    Ok(data.into())
}

/// Loads the environment map, then all fonts concurrently.
#[instrument(skip_all, fields(fonts = manifest.fonts.len()))]
pub async fn load_scene_assets(
    source: Arc<dyn AssetSource>,
    manifest: &AssetManifest,
) -> Result<SceneAssets, AssetError> {
    let data = fetch_non_empty(source.as_ref(), &manifest.environment).await?;
    debug!(url = %manifest.environment, bytes = data.len(), "Environment loaded");
    let environment = EnvironmentMap {
        url: manifest.environment.clone(),
        data,
    };

    let mut pending = JoinSet::new();
    for (index, font) in manifest.fonts.iter().cloned().enumerate() {
        let source = Arc::clone(&source);
        pending.spawn(async move {
            let data = fetch_non_empty(source.as_ref(), &font.url).await?;
            Ok::<_, AssetError>((index, FontFace { name: font.name, data }))
        });
    }

    let mut fonts: Vec<(usize, FontFace)> = Vec::with_capacity(manifest.fonts.len());
    while let Some(joined) = pending.join_next().await {
        let loaded = joined.map_err(|e| AssetError::Fetch {
            url: "font".to_string(),
            reason: e.to_string(),
        })??;
        fonts.push(loaded);
    }
    fonts.sort_by_key(|(index, _)| *index);

    info!(fonts = fonts.len(), "Scene assets loaded");
    Ok(SceneAssets {
        environment,
        fonts: fonts.into_iter().map(|(_, face)| face).collect(),
    })
}

/// Builds the pool and the labels whose font is available.
pub fn prepare_content(
    config: &SceneConfig,
    assets: &SceneAssets,
) -> Result<SceneContent, SceneError> {
    let pool = build_pool(&config.pool, config.seed)?;
    let labels = config
        .labels
        .iter()
        .filter(|label| {
            let available = assets.font(&label.font).is_some();
            if !available {
                warn!(text = %label.text, font = %label.font, "Font not loaded, label skipped");
            }
            available
        })
        .cloned()
        .map(FloatingLabel::new)
        .collect();
    Ok(SceneContent { pool, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decor::StarConfig;

    #[tokio::test]
    async fn test_placeholder_assets_load_in_manifest_order() {
        let manifest = AssetManifest::default();
        let source: Arc<dyn AssetSource> = Arc::new(StaticAssets::placeholder(&manifest));

        let assets = load_scene_assets(source, &manifest).await.unwrap();

        assert_eq!(assets.environment.url, manifest.environment);
        let names: Vec<&str> = assets.fonts.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["optimer_bold", "gentilis_regular"]);
    }

    #[tokio::test]
    async fn test_missing_environment_fails_before_fonts() {
        let manifest = AssetManifest::default();
        let source: Arc<dyn AssetSource> = Arc::new(StaticAssets::new());

        let err = load_scene_assets(source, &manifest).await.unwrap_err();

        assert!(matches!(err, AssetError::Fetch { url, .. } if url == manifest.environment));
    }

    #[tokio::test]
    async fn test_empty_payload_is_rejected() {
        let manifest = AssetManifest {
            environment: "env.hdr".to_string(),
            fonts: Vec::new(),
        };
        let source: Arc<dyn AssetSource> = Arc::new(StaticAssets::new().with("env.hdr", Vec::new()));

        let err = load_scene_assets(source, &manifest).await.unwrap_err();

        assert_eq!(err, AssetError::Empty("env.hdr".to_string()));
    }

    #[test]
    fn test_labels_without_font_are_skipped() {
        let mut config = SceneConfig {
            stars: StarConfig {
                count: 0,
                ..StarConfig::default()
            },
            ..SceneConfig::default()
        };
        config.pool.hearts.count = 2;
        config.pool.spheres.count = 1;
        let assets = SceneAssets {
            environment: EnvironmentMap {
                url: "env".to_string(),
                data: Arc::from(&b"x"[..]),
            },
            fonts: vec![FontFace {
                name: "gentilis_regular".to_string(),
                data: Arc::from(&b"x"[..]),
            }],
        };

        let content = prepare_content(&config, &assets).unwrap();

        assert_eq!(content.pool.len(), 3);
        assert_eq!(content.labels.len(), 1);
        assert_eq!(content.labels[0].text(), "Karencita");
    }
}

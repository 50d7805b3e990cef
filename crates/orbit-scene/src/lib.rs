//! # Orbit Scene
//!
//! A headless animator for a field of hearts and spheres orbiting a vertical
//! axis, with a pointer-driven parallax camera, a slowly turning star field
//! and two floating text labels.
//!
//! ## Architecture Overview
//!
//! The crate is split into three layers:
//!
//! 1. **Model** ([`object`], [`motion`], [`camera`], [`decor`], [`scene`]) - plain
//!    values and the per-frame math. No async, no I/O.
//! 2. **Runtime** ([`SceneActor`], [`FrameDriver`]) - one task owns the
//!    [`SceneState`] and processes requests sequentially; another ticks it at
//!    a fixed rate.
//! 3. **Interface** ([`SceneClient`]) - the cloneable handle everything else
//!    talks through.
//!
//! Rendering is delegated to a [`RenderSink`]. The animator writes one
//! transform per object into an [`InstanceBuffer`] per kind, flags it dirty
//! once per frame, and the sink uploads whatever is flagged.
//!
//! ## Lifecycle
//!
//! ```text
//! SceneActor::new ──► Uninitialized ──(assets loaded, install)──► Running
//!                      camera + stars                              + pool + labels
//! ```
//!
//! Assets are loaded by [`load_scene_assets`]; [`prepare_content`] turns them
//! and the [`SceneConfig`] into the content handed to [`SceneClient::install`].
//!
//! ## Testing
//!
//! See [`mock`] for a recording sink and a client wired to a bare receiver.

pub mod actor;
pub mod assets;
pub mod buffer;
pub mod camera;
pub mod client;
pub mod decor;
pub mod driver;
pub mod error;
pub mod message;
pub mod mock;
pub mod motion;
pub mod object;
pub mod scene;
pub mod sink;

pub use actor::SceneActor;
pub use assets::{
    load_scene_assets, prepare_content, AssetManifest, AssetSource, HttpAssetSource, SceneAssets,
    StaticAssets,
};
pub use buffer::InstanceBuffer;
pub use camera::{CameraConfig, ParallaxCamera, Pointer, Viewport};
pub use client::SceneClient;
pub use decor::{FloatingLabel, LabelConfig, StarConfig, StarField};
pub use driver::FrameDriver;
pub use error::{AssetError, SceneError};
pub use message::{Response, SceneRequest};
pub use motion::MotionConfig;
pub use object::{build_pool, ObjectKind, ObjectPool, OrbitingObject, PoolConfig};
pub use scene::{
    FrameReport, FrameView, SceneConfig, SceneContent, ScenePhase, SceneSnapshot, SceneState,
};
pub use sink::{HeadlessSink, RenderSink};

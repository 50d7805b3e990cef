//! # Scene State
//!
//! [`SceneState`] gathers everything the per-frame update touches: the object
//! pool with its instance buffers, the parallax camera, the star field and the
//! floating labels. It is a plain value, so the whole animation can be driven
//! and inspected in tests without a renderer.
//!
//! ## Phases
//!
//! The pool only exists once assets have loaded. Until then the scene is
//! [`ScenePhase::Uninitialized`] and frames leave objects untouched (the camera
//! and stars still move). [`SceneState::install`] switches to
//! [`ScenePhase::Running`], which lasts until the scene is dropped.

use crate::camera::{CameraConfig, ParallaxCamera, Pointer, Viewport};
use crate::decor::{FloatingLabel, LabelConfig, StarConfig, StarField};
use crate::error::SceneError;
use crate::motion::MotionConfig;
use crate::object::{ObjectKind, ObjectPool, PoolConfig};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub seed: u64,
    pub fps: u32,
    pub viewport: Viewport,
    pub pool: PoolConfig,
    pub motion: MotionConfig,
    pub camera: CameraConfig,
    pub stars: StarConfig,
    pub labels: Vec<LabelConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            fps: 60,
            viewport: Viewport::default(),
            pool: PoolConfig::default(),
            motion: MotionConfig::default(),
            camera: CameraConfig::default(),
            stars: StarConfig::default(),
            labels: LabelConfig::defaults(),
        }
    }
}

/// What gets installed once assets are ready.
#[derive(Debug, Clone)]
pub struct SceneContent {
    pub pool: ObjectPool,
    pub labels: Vec<FloatingLabel>,
}

#[derive(Debug, Clone)]
pub enum ScenePhase {
    Uninitialized,
    Running {
        pool: ObjectPool,
        labels: Vec<FloatingLabel>,
    },
}

/// Outcome of one call to [`SceneState::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// 1-based frame counter.
    pub frame: u64,
    pub time: f32,
    /// Number of orbiting objects advanced; zero while uninitialized.
    pub advanced: usize,
    pub running: bool,
}

/// Per-frame data handed to a render sink alongside the buffers.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub frame: u64,
    pub time: f32,
    pub view: Mat4,
    pub projection: Mat4,
    pub star_rotation: f32,
    pub labels: &'a [FloatingLabel],
}

/// Owned copy of the scene for inspection.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    pub frames: u64,
    pub pool: Option<ObjectPool>,
    pub labels: Vec<FloatingLabel>,
    pub camera_position: Vec3,
    pub aspect: f32,
    pub star_rotation: f32,
}

impl SceneSnapshot {
    pub fn is_running(&self) -> bool {
        self.pool.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SceneState {
    phase: ScenePhase,
    motion: MotionConfig,
    camera: ParallaxCamera,
    stars: StarField,
    frames: u64,
    last_time: f32,
}

impl SceneState {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            phase: ScenePhase::Uninitialized,
            motion: config.motion,
            camera: ParallaxCamera::new(config.camera, config.viewport),
            stars: StarField::generate(&config.stars, config.seed),
            frames: 0,
            last_time: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, ScenePhase::Running { .. })
    }

    pub fn phase(&self) -> &ScenePhase {
        &self.phase
    }

    pub fn pool(&self) -> Option<&ObjectPool> {
        match &self.phase {
            ScenePhase::Running { pool, .. } => Some(pool),
            ScenePhase::Uninitialized => None,
        }
    }

    pub(crate) fn pool_mut(&mut self) -> Option<&mut ObjectPool> {
        match &mut self.phase {
            ScenePhase::Running { pool, .. } => Some(pool),
            ScenePhase::Uninitialized => None,
        }
    }

    pub fn labels(&self) -> &[FloatingLabel] {
        match &self.phase {
            ScenePhase::Running { labels, .. } => labels,
            ScenePhase::Uninitialized => &[],
        }
    }

    pub fn camera(&self) -> &ParallaxCamera {
        &self.camera
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Moves from `Uninitialized` to `Running`. A running scene keeps its pool.
    pub fn install(&mut self, content: SceneContent) -> Result<(), SceneError> {
        if self.is_running() {
            return Err(SceneError::AlreadyRunning);
        }
        self.phase = ScenePhase::Running {
            pool: content.pool,
            labels: content.labels,
        };
        Ok(())
    }

    pub fn set_pointer(&mut self, pointer: Pointer) {
        self.camera.set_pointer(pointer);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.camera.resize(viewport);
    }

    /// Runs one frame at `time` seconds since start.
    ///
    /// Every invocation advances each object exactly once; `time` only feeds
    /// the oscillation terms.
    pub fn advance(&mut self, time: f32) -> FrameReport {
        self.frames += 1;
        self.last_time = time;
        self.stars.advance();
        self.camera.update();

        let advanced = match &mut self.phase {
            ScenePhase::Uninitialized => 0,
            ScenePhase::Running { pool, labels } => {
                for label in labels.iter_mut() {
                    label.update(time);
                }
                advance_pool(&self.motion, pool, time)
            }
        };

        FrameReport {
            frame: self.frames,
            time,
            advanced,
            running: self.is_running(),
        }
    }

    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            frame: self.frames,
            time: self.last_time,
            view: self.camera.view(),
            projection: self.camera.projection(),
            star_rotation: self.stars.rotation_y(),
            labels: self.labels(),
        }
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            frames: self.frames,
            pool: self.pool().cloned(),
            labels: self.labels().to_vec(),
            camera_position: self.camera.position(),
            aspect: self.camera.aspect(),
            star_rotation: self.stars.rotation_y(),
        }
    }
}

fn advance_pool(motion: &MotionConfig, pool: &mut ObjectPool, time: f32) -> usize {
    let ObjectPool {
        objects,
        hearts,
        spheres,
    } = pool;

    for object in objects.iter_mut() {
        let transform = motion.advance(object, time);
        let buffer = match object.kind() {
            ObjectKind::Heart => &mut *hearts,
            ObjectKind::Sphere => &mut *spheres,
        };
        buffer.set_matrix_at(object.slot_index(), transform);
    }

    // Once per frame, not per object.
    hearts.mark_dirty();
    spheres.mark_dirty();
    objects.len()
}

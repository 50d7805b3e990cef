//! # Orbiting Objects & Pool Generation
//!
//! Every decorative instance in the scene is an [`OrbitingObject`]: a heart or a
//! sphere on its own horizontal circular orbit around the origin. The whole set
//! is produced once by [`build_pool`] from a [`PoolConfig`] and a seed, which
//! makes the scene reproducible and testable without any rendering context.
//!
//! ## Identity is positional
//!
//! Each object owns a `slot_index` into the instance buffer of its kind. Slots
//! are assigned in generation order (`0..count` per kind) and never change, so
//! the pool can be walked every frame without any lookup.

use crate::buffer::InstanceBuffer;
use crate::error::SceneError;
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::f64::consts::TAU;

/// Linear RGB colour with components in `[0, 1]`.
pub type Rgb = [f32; 3];

/// Converts a `0xRRGGBB` literal into an [`Rgb`] triple.
pub fn rgb_from_hex(hex: u32) -> Rgb {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0)]
}

/// The two shapes that orbit the scene. Each kind has its own instance buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Heart,
    Sphere,
}

/// One decorative instance following an independent circular orbit.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingObject {
    kind: ObjectKind,
    orbit_radius: f64,
    orbit_speed: f64,
    pub(crate) orbit_angle: f64,
    pub(crate) vertical_offset: f64,
    rotation: Vec3,
    scale: f64,
    slot_index: usize,
    tint: Option<Rgb>,
}

impl OrbitingObject {
    /// Creates an object from explicit parameters.
    ///
    /// `rotation` holds Euler angles (radians) applied in XYZ order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ObjectKind,
        slot_index: usize,
        orbit_radius: f64,
        orbit_speed: f64,
        orbit_angle: f64,
        vertical_offset: f64,
        rotation: Vec3,
        scale: f64,
    ) -> Self {
        Self {
            kind,
            orbit_radius,
            orbit_speed,
            orbit_angle,
            vertical_offset,
            rotation,
            scale,
            slot_index,
            tint: None,
        }
    }

    pub fn with_tint(mut self, tint: Rgb) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn orbit_radius(&self) -> f64 {
        self.orbit_radius
    }

    pub fn orbit_speed(&self) -> f64 {
        self.orbit_speed
    }

    pub fn orbit_angle(&self) -> f64 {
        self.orbit_angle
    }

    pub fn vertical_offset(&self) -> f64 {
        self.vertical_offset
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn slot_index(&self) -> usize {
        self.slot_index
    }

    pub fn tint(&self) -> Option<Rgb> {
        self.tint
    }

    /// Fixed orientation assigned at creation.
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Point on the orbit at the current angle and the given height.
    pub fn orbit_position(&self, y: f32) -> Vec3 {
        Vec3::new(
            (self.orbit_radius * self.orbit_angle.cos()) as f32,
            y,
            (self.orbit_radius * self.orbit_angle.sin()) as f32,
        )
    }

    /// Composes translation · rotation · scale for the given height and
    /// orientation. Scale always comes from the stored value.
    pub fn compose(&self, y: f32, orientation: Quat) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale as f32),
            orientation,
            self.orbit_position(y),
        )
    }
}

/// Closed-open sampling interval `[min, max)`. A degenerate span yields `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..self.max)
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && (value < self.max || self.min == self.max)
    }

    fn validate(&self, field: &str) -> Result<(), SceneError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(SceneError::InvalidConfig(format!(
                "{field}: span [{}, {}) is not an ordered finite range",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Occasional oversized instances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LargeScale {
    /// Probability in `[0, 1]` that an instance draws from `span`.
    pub chance: f64,
    pub span: Span,
}

/// Generation parameters for one object kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindParams {
    pub count: usize,
    pub radius: Span,
    /// Signed angular step per frame; the sign sets the orbit direction.
    pub speed: Span,
    pub vertical: Span,
    pub scale: Span,
    #[serde(default)]
    pub large_scale: Option<LargeScale>,
    /// `0xRRGGBB` colours; each instance picks one uniformly.
    #[serde(default)]
    pub palette: Vec<u32>,
}

impl KindParams {
    pub fn hearts() -> Self {
        Self {
            count: 500,
            radius: Span::new(10.0, 40.0),
            speed: Span::new(-0.004, -0.001),
            vertical: Span::new(-40.0, 40.0),
            scale: Span::new(0.15, 0.35),
            large_scale: Some(LargeScale {
                chance: 0.2,
                span: Span::new(0.4, 1.1),
            }),
            palette: vec![0xff4d6d, 0xff809c, 0xff99cc, 0xff3366, 0xff6699],
        }
    }

    pub fn spheres() -> Self {
        Self {
            count: 20,
            radius: Span::new(8.0, 33.0),
            speed: Span::new(-0.007, -0.002),
            vertical: Span::new(-30.0, 30.0),
            scale: Span::new(0.2, 0.4),
            large_scale: None,
            palette: vec![0xc2a2da],
        }
    }

    fn validate(&self, kind: ObjectKind) -> Result<(), SceneError> {
        let name = format!("{kind:?}").to_lowercase();
        self.radius.validate(&format!("{name}.radius"))?;
        self.speed.validate(&format!("{name}.speed"))?;
        self.vertical.validate(&format!("{name}.vertical"))?;
        self.scale.validate(&format!("{name}.scale"))?;
        if self.radius.min <= 0.0 {
            return Err(SceneError::InvalidConfig(format!(
                "{name}.radius must be positive"
            )));
        }
        if self.scale.min <= 0.0 {
            return Err(SceneError::InvalidConfig(format!(
                "{name}.scale must be positive"
            )));
        }
        if let Some(large) = &self.large_scale {
            large.span.validate(&format!("{name}.large_scale.span"))?;
            if large.span.min <= 0.0 {
                return Err(SceneError::InvalidConfig(format!(
                    "{name}.large_scale.span must be positive"
                )));
            }
            if !(0.0..=1.0).contains(&large.chance) {
                return Err(SceneError::InvalidConfig(format!(
                    "{name}.large_scale.chance must lie in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    fn sample(&self, kind: ObjectKind, slot_index: usize, rng: &mut StdRng) -> OrbitingObject {
        let orbit_radius = self.radius.sample(rng);
        let orbit_speed = self.speed.sample(rng);
        let orbit_angle = rng.gen_range(0.0..TAU);
        let vertical_offset = self.vertical.sample(rng);
        let scale = match &self.large_scale {
            Some(large) if rng.gen_bool(large.chance) => large.span.sample(rng),
            _ => self.scale.sample(rng),
        };
        let rotation = Vec3::new(
            rng.gen_range(0.0..PI),
            rng.gen_range(0.0..PI),
            rng.gen_range(0.0..PI),
        );

        let object = OrbitingObject::new(
            kind,
            slot_index,
            orbit_radius,
            orbit_speed,
            orbit_angle,
            vertical_offset,
            rotation,
            scale,
        );
        if self.palette.is_empty() {
            object
        } else {
            let hex = self.palette[rng.gen_range(0..self.palette.len())];
            object.with_tint(rgb_from_hex(hex))
        }
    }
}

/// Generation parameters for the whole pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub hearts: KindParams,
    pub spheres: KindParams,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            hearts: KindParams::hearts(),
            spheres: KindParams::spheres(),
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        self.hearts.validate(ObjectKind::Heart)?;
        self.spheres.validate(ObjectKind::Sphere)
    }
}

/// The fixed set of orbiting objects plus one instance buffer per kind.
#[derive(Debug, Clone)]
pub struct ObjectPool {
    pub(crate) objects: Vec<OrbitingObject>,
    pub(crate) hearts: InstanceBuffer,
    pub(crate) spheres: InstanceBuffer,
}

impl ObjectPool {
    /// Wraps `objects` and sizes each buffer to the number of objects of its
    /// kind. Initial transforms and tints are written immediately.
    ///
    /// Slot indices must be unique and dense per kind.
    pub fn new(objects: Vec<OrbitingObject>) -> Result<Self, SceneError> {
        let heart_count = objects.iter().filter(|o| o.kind == ObjectKind::Heart).count();
        let sphere_count = objects.len() - heart_count;
        let mut hearts = InstanceBuffer::new(ObjectKind::Heart, heart_count);
        let mut spheres = InstanceBuffer::new(ObjectKind::Sphere, sphere_count);
        let mut seen_hearts = vec![false; heart_count];
        let mut seen_spheres = vec![false; sphere_count];

        for object in &objects {
            let (buffer, seen) = match object.kind {
                ObjectKind::Heart => (&mut hearts, &mut seen_hearts),
                ObjectKind::Sphere => (&mut spheres, &mut seen_spheres),
            };
            match seen.get_mut(object.slot_index) {
                Some(taken) if !*taken => *taken = true,
                _ => {
                    return Err(SceneError::InvalidConfig(format!(
                        "{:?} slot {} is out of range or assigned twice",
                        object.kind, object.slot_index
                    )))
                }
            }
            let transform = object.compose(object.vertical_offset as f32, object.orientation());
            buffer.set_matrix_at(object.slot_index, transform);
            if let Some(tint) = object.tint {
                buffer.set_color_at(object.slot_index, tint);
            }
        }

        Ok(Self {
            objects,
            hearts,
            spheres,
        })
    }

    pub fn objects(&self) -> &[OrbitingObject] {
        &self.objects
    }

    pub fn buffer(&self, kind: ObjectKind) -> &InstanceBuffer {
        match kind {
            ObjectKind::Heart => &self.hearts,
            ObjectKind::Sphere => &self.spheres,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Generates the pool deterministically from `config` and `seed`.
///
/// Hearts are generated first, then spheres, from a single seeded stream, so
/// the same inputs always yield the same pool.
pub fn build_pool(config: &PoolConfig, seed: u64) -> Result<ObjectPool, SceneError> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut objects = Vec::with_capacity(config.hearts.count + config.spheres.count);

    for (kind, params) in [
        (ObjectKind::Heart, &config.hearts),
        (ObjectKind::Sphere, &config.spheres),
    ] {
        for slot_index in 0..params.count {
            objects.push(params.sample(kind, slot_index, &mut rng));
        }
    }

    ObjectPool::new(objects)
}

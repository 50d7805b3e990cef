//! Background star field and floating text labels.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count: usize,
    /// Edge length of the cube centred on the origin that holds the stars.
    pub extent: f32,
    /// Rotation about the vertical axis added every frame (radians).
    pub spin_per_frame: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 15_000,
            extent: 2_000.0,
            spin_per_frame: 0.0001,
        }
    }
}

/// A fixed point cloud that turns slowly around the vertical axis.
#[derive(Debug, Clone, PartialEq)]
pub struct StarField {
    points: Vec<Vec3>,
    rotation_y: f32,
    spin_per_frame: f32,
}

impl StarField {
    pub fn generate(config: &StarConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let half = config.extent * 0.5;
        let mut coord = || {
            if half > 0.0 {
                rng.gen_range(-half..half)
            } else {
                0.0
            }
        };
        let points = (0..config.count)
            .map(|_| Vec3::new(coord(), coord(), coord()))
            .collect();
        Self {
            points,
            rotation_y: 0.0,
            spin_per_frame: config.spin_per_frame,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn advance(&mut self) {
        self.rotation_y += self.spin_per_frame;
    }
}

/// Where and how a label floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub text: String,
    pub anchor: [f32; 3],
    #[serde(default = "LabelConfig::default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "LabelConfig::default_rate")]
    pub rate: f32,
    #[serde(default)]
    pub phase: f32,
    /// Name of the font face, matched against the loaded fonts.
    pub font: String,
}

impl LabelConfig {
    fn default_amplitude() -> f32 {
        0.1
    }

    fn default_rate() -> f32 {
        0.5
    }

    /// The two default captions: one bobbing on a sine, one on a cosine.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                text: "Te amo muchisimo".to_string(),
                anchor: [0.0, 2.5, 2.0],
                amplitude: 0.1,
                rate: 0.5,
                phase: 0.0,
                font: "optimer_bold".to_string(),
            },
            Self {
                text: "Karencita".to_string(),
                anchor: [0.0, -1.8, 2.0],
                amplitude: 0.1,
                rate: 0.5,
                phase: FRAC_PI_2,
                font: "gentilis_regular".to_string(),
            },
        ]
    }
}

/// A caption placed in the scene once its font is available.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingLabel {
    config: LabelConfig,
    position: Vec3,
}

impl FloatingLabel {
    pub fn new(config: LabelConfig) -> Self {
        let position = Vec3::from_array(config.anchor);
        Self { config, position }
    }

    pub fn text(&self) -> &str {
        &self.config.text
    }

    pub fn font(&self) -> &str {
        &self.config.font
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Height is recomputed from the anchor, never accumulated.
    pub fn update(&mut self, time: f32) {
        let c = &self.config;
        self.position.y = c.anchor[1] + c.amplitude * (time * c.rate + c.phase).sin();
    }
}

//! Per-frame motion rules.
//!
//! The orbit itself is fixed: the angle grows by the object's speed once per
//! frame and the position is evaluated on the circle. What varies between
//! scene variants is the vertical motion and whether instances spin.
//!
//! Angles and heights accumulate in `f64`; only the finished transform is
//! narrowed to `f32`.

use crate::object::OrbitingObject;
use glam::{Mat4, Quat};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// `amplitude * sin(time * rate + phase)`, where the phase is the object's
/// current vertical offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub amplitude: f64,
    pub rate: f64,
}

impl Oscillation {
    pub fn offset(&self, time: f64, phase: f64) -> f64 {
        self.amplitude * (time * self.rate + phase).sin()
    }
}

impl Default for Oscillation {
    fn default() -> Self {
        Self {
            amplitude: 0.5,
            rate: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Subtracted from every vertical offset each frame. Never reset.
    pub fall_per_frame: f64,
    pub oscillation: Option<Oscillation>,
    /// Adds a rotation about the vertical axis equal to the orbit angle.
    pub spin: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            fall_per_frame: 0.005,
            oscillation: Some(Oscillation::default()),
            spin: false,
        }
    }
}

impl MotionConfig {
    /// Pure orbit: constant height, fixed orientation.
    pub fn baseline() -> Self {
        Self {
            fall_per_frame: 0.0,
            oscillation: None,
            spin: false,
        }
    }

    /// Height at which the object is drawn for its current state.
    pub fn height(&self, object: &OrbitingObject, time: f32) -> f64 {
        let y = object.vertical_offset;
        match &self.oscillation {
            Some(osc) => y + osc.offset(f64::from(time), y),
            None => y,
        }
    }

    pub fn orientation(&self, object: &OrbitingObject) -> Quat {
        if self.spin {
            let turn = object.orbit_angle.rem_euclid(TAU) as f32;
            Quat::from_rotation_y(turn) * object.orientation()
        } else {
            object.orientation()
        }
    }

    /// Advances `object` by exactly one frame and returns its new transform.
    pub fn advance(&self, object: &mut OrbitingObject, time: f32) -> Mat4 {
        object.orbit_angle += object.orbit_speed();
        object.vertical_offset -= self.fall_per_frame;
        let y = self.height(object, time);
        object.compose(y as f32, self.orientation(object))
    }
}

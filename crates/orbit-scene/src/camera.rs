//! Pointer-driven parallax camera.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Drawable surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Pointer position in normalised device coordinates: x right, y up, both in
/// `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts window pixel coordinates (origin top-left) into NDC.
    pub fn from_screen(client_x: f32, client_y: f32, viewport: Viewport) -> Self {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Self::default();
        }
        Self {
            x: (client_x / viewport.width) * 2.0 - 1.0,
            y: -(client_y / viewport.height) * 2.0 + 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    /// Fraction of the remaining distance covered each frame.
    pub damping: f32,
    /// Pointer-to-world scale of the parallax target.
    pub strength: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 20.0,
            damping: 0.05,
            strength: 1.5,
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Camera that eases toward a pointer-derived target while always looking at
/// the scene origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxCamera {
    position: Vec3,
    pointer: Pointer,
    aspect: f32,
    config: CameraConfig,
}

impl ParallaxCamera {
    pub fn new(config: CameraConfig, viewport: Viewport) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, config.distance),
            pointer: Pointer::default(),
            aspect: viewport.aspect(),
            config,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_pointer(&mut self, pointer: Pointer) {
        self.pointer = pointer;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }

    /// Where the camera is heading. Depth is left untouched.
    pub fn target(&self) -> Vec3 {
        Vec3::new(
            self.pointer.x * self.config.strength,
            -self.pointer.y * self.config.strength,
            self.position.z,
        )
    }

    /// One step of exponential smoothing toward [`Self::target`].
    pub fn update(&mut self) {
        self.position += (self.target() - self.position) * self.config.damping;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.config.fov_y_degrees.to_radians(),
            self.aspect,
            self.config.near,
            self.config.far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_from_screen_maps_corners() {
        let viewport = Viewport::new(200.0, 100.0);
        assert_eq!(Pointer::from_screen(0.0, 0.0, viewport), Pointer::new(-1.0, 1.0));
        assert_eq!(Pointer::from_screen(200.0, 100.0, viewport), Pointer::new(1.0, -1.0));
        assert_eq!(Pointer::from_screen(100.0, 50.0, viewport), Pointer::new(0.0, 0.0));
    }

    #[test]
    fn test_update_moves_a_damped_fraction_toward_target() {
        let mut camera = ParallaxCamera::new(CameraConfig::default(), Viewport::default());
        camera.set_pointer(Pointer::new(1.0, 1.0));

        camera.update();

        let p = camera.position();
        assert!((p.x - 1.5 * 0.05).abs() < 1e-6);
        assert!((p.y + 1.5 * 0.05).abs() < 1e-6);
        assert_eq!(p.z, 20.0);
    }

    #[test]
    fn test_camera_converges_to_target() {
        let mut camera = ParallaxCamera::new(CameraConfig::default(), Viewport::default());
        camera.set_pointer(Pointer::new(-0.5, 0.25));

        for _ in 0..1000 {
            camera.update();
        }

        assert!((camera.position() - camera.target()).length() < 1e-4);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = ParallaxCamera::new(CameraConfig::default(), Viewport::default());
        camera.resize(Viewport::new(800.0, 800.0));
        assert_eq!(camera.aspect(), 1.0);
        camera.resize(Viewport::new(800.0, 0.0));
        assert_eq!(camera.aspect(), 1.0);
    }
}

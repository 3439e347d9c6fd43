use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::config::settings::CameraSettings;
use crate::scene::transform::Transform;

const EPS: f32 = 0.0001;

/// Orbit camera controller.
///
/// Spherical coordinates are re-derived from the camera's current position on
/// every [`update`](Self::update), so code that moves the camera directly
/// (scripted moves) and user input compose instead of fighting each other.
pub struct OrbitControls {
    pub target: Vec3,

    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub enable_pan: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    // (theta, phi) still to be applied
    rotate_delta: Vec2,
    scale: f32,
}

impl OrbitControls {
    #[must_use]
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            damping_factor: 0.05,
            enable_damping: true,
            enable_pan: false,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            rotate_delta: Vec2::ZERO,
            scale: 1.0,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            damping_factor: settings.damping_factor,
            enable_damping: settings.enable_damping,
            enable_pan: settings.enable_pan,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
            ..Self::new(settings.target)
        }
    }

    /// Queues a drag of `delta` pixels on a viewport `viewport_height` tall.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let per_pixel = 2.0 * PI / viewport_height.max(1.0) * self.rotate_speed;
        self.rotate_delta -= delta * per_pixel;
    }

    /// Queues a wheel zoom; positive values move closer.
    pub fn zoom(&mut self, wheel: f32) {
        if wheel == 0.0 {
            return;
        }
        let step = (1.0 - self.zoom_speed).powf(wheel.abs());
        if wheel > 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Drops pending rotation and zoom.
    pub fn stop(&mut self) {
        self.rotate_delta = Vec2::ZERO;
        self.scale = 1.0;
    }

    /// Applies pending input, clamps the distance and points `transform` at
    /// the target.
    pub fn update(&mut self, transform: &mut Transform, dt: f32) {
        let offset = transform.position - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > EPS {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        if self.enable_damping {
            let retention = (1.0 - self.damping_factor).powf(dt * 60.0);
            let applied = self.rotate_delta * (1.0 - retention);
            theta += applied.x;
            phi += applied.y;
            self.rotate_delta *= retention;
        } else {
            theta += self.rotate_delta.x;
            phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }
        phi = phi.clamp(EPS, PI - EPS);

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.scale = 1.0;

        let sin_phi = phi.sin();
        let offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );

        transform.position = self.target + offset;
        transform.look_at(self.target, Vec3::Y);
    }
}

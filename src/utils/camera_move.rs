use glam::Vec3;

use crate::scene::camera::Camera;
use crate::utils::orbit_control::OrbitControls;

/// Quadratic ease-in for the first half, quadratic ease-out for the second.
#[must_use]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CameraMove {
    from: Vec3,
    to: Vec3,
    target: Vec3,
    started_at: f32,
    duration: f32,
}

/// Scripted camera move driven from the frame loop.
///
/// Starting a move while another is running replaces it; the new move begins
/// at wherever the camera is at that moment.
#[derive(Debug, Default)]
pub struct CameraMover {
    current: Option<CameraMove>,
}

impl CameraMover {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a move from `from` to `to` at clock time `now` (seconds),
    /// keeping the orbit controls aimed at `target`.
    pub fn start(&mut self, from: Vec3, to: Vec3, target: Vec3, now: f32, duration: f32) {
        if self.current.is_some() {
            log::debug!("Camera move restarted from current position");
        }
        self.current = Some(CameraMove {
            from,
            to,
            target,
            started_at: now,
            duration,
        });
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn destination(&self) -> Option<Vec3> {
        self.current.map(|m| m.to)
    }

    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Moves the camera to its eased position for clock time `now` and
    /// re-asserts the controls' target. Returns `true` while still moving.
    pub fn step(&mut self, now: f32, camera: &mut Camera, controls: &mut OrbitControls) -> bool {
        let Some(m) = self.current else {
            return false;
        };

        let progress = if m.duration > 0.0 {
            ((now - m.started_at) / m.duration).min(1.0)
        } else {
            1.0
        };

        camera.set_position(m.from.lerp(m.to, ease_in_out_quad(progress)));
        controls.target = m.target;
        controls.update(&mut camera.transform, 0.0);

        if progress >= 1.0 {
            self.current = None;
            return false;
        }
        true
    }
}

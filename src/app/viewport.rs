use std::time::Duration;

use crate::composer::Composer;
use crate::utils::time::Timer;

/// Timing information for the current frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameState {
    /// Total elapsed time since the viewport started (in seconds).
    pub time: f32,
    /// Delta time since the last frame (in seconds).
    pub dt: f32,
    /// Total number of frames since startup.
    pub frame_count: u64,
}

/// Frame loop owner.
///
/// Each frame measures the time since the previous one and advances the
/// composer by exactly that delta. Rendering itself happens elsewhere; the
/// viewport only keeps camera aspect and timing in sync.
pub struct Viewport {
    timer: Timer,
    width: u32,
    height: u32,
    /// Upper bound on the delta fed to animations, for frames that arrive
    /// after a long stall.
    pub max_delta: f32,
    /// Minimum wall time per frame in [`run`](Self::run).
    pub frame_interval: Option<Duration>,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            timer: Timer::new(),
            width,
            height,
            max_delta: 0.1,
            frame_interval: Some(Duration::from_micros(16_667)),
        }
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Records the new size and updates the camera aspect. Zero sizes
    /// (minimized windows) are ignored.
    pub fn resize(&mut self, composer: &mut Composer, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        composer.camera_mut().resize(width, height);
        log::debug!("Viewport resized to {width}x{height}");
    }

    /// Ticks the clock and advances the composer by the measured delta.
    pub fn frame(&mut self, composer: &mut Composer) -> FrameState {
        self.timer.tick();
        let dt = self.timer.dt_seconds().min(self.max_delta);
        composer.advance(dt);
        FrameState {
            time: self.timer.elapsed_seconds(),
            dt,
            frame_count: self.timer.frame_count,
        }
    }

    /// Runs frames until `keep_running` returns `false`.
    pub fn run(
        &mut self,
        composer: &mut Composer,
        mut keep_running: impl FnMut(&mut Composer, &FrameState) -> bool,
    ) {
        self.timer.reset();
        loop {
            let state = self.frame(composer);
            if !keep_running(composer, &state) {
                break;
            }
            if let Some(interval) = self.frame_interval {
                std::thread::sleep(interval);
            }
        }
    }
}

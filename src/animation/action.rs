use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Repeat,
    PingPong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Replaces the rest pose, weighted against other normal actions.
    Normal,
    /// Layered as an offset on top of the blended normal result.
    Additive,
}

/// Playback state of one clip on one part.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    /// With `LoopMode::Once`, keep applying the last frame after finishing.
    pub clamp_when_finished: bool,
    pub blend_mode: BlendMode,

    running: bool,
    paused: bool,
    finished: bool,
    /// +1 while playing forward, -1 on the way back in `PingPong`.
    direction: f32,

    pub bindings: Vec<PropertyBinding>,
    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        let blend_mode = if clip.additive {
            BlendMode::Additive
        } else {
            BlendMode::Normal
        };
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Repeat,
            clamp_when_finished: false,
            blend_mode,
            running: false,
            paused: false,
            finished: false,
            direction: 1.0,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    /// Starts (or resumes) playback from the current time.
    pub fn play(&mut self) {
        self.running = true;
        self.paused = false;
    }

    /// Stops playback and rewinds.
    pub fn stop(&mut self) {
        self.running = false;
        self.reset();
    }

    /// Rewinds to the start without changing the running flag.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.paused = false;
        self.finished = false;
        self.direction = 1.0;
        self.track_cursors.fill(KeyframeCursor::default());
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Weight this action contributes this frame.
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if self.running { self.weight.max(0.0) } else { 0.0 }
    }

    /// Advances local time by `dt` seconds according to the loop mode.
    pub fn update(&mut self, dt: f32) {
        if !self.running || self.paused {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        let step = dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                self.time += step;
                if self.time >= duration || self.time < 0.0 {
                    self.time = self.time.clamp(0.0, duration);
                    self.finished = true;
                    if self.clamp_when_finished {
                        // Hold the last frame
                        self.paused = true;
                    } else {
                        self.running = false;
                    }
                }
            }
            LoopMode::Repeat => {
                self.time = (self.time + step).rem_euclid(duration);
            }
            LoopMode::PingPong => {
                // Unfold into one forward-and-back cycle of length 2 * duration
                let double = duration * 2.0;
                let phase = if self.direction > 0.0 {
                    self.time
                } else {
                    double - self.time
                };
                let phase = (phase + step).rem_euclid(double);
                if phase <= duration {
                    self.time = phase;
                    self.direction = 1.0;
                } else {
                    self.time = double - phase;
                    self.direction = -1.0;
                }
            }
        }
    }

    /// Samples the track behind `binding_index` at the current time.
    pub(crate) fn sample(&mut self, binding_index: usize) -> Option<SampledValue> {
        let binding = self.bindings.get(binding_index)?;
        let track = self.clip.tracks.get(binding.track_index)?;
        let cursor = self.track_cursors.get_mut(binding.track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(SampledValue::Vector3),
            TrackData::Quaternion(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(SampledValue::Quaternion),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum SampledValue {
    Vector3(Vec3),
    Quaternion(Quat),
}

use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last keyframe interval so sequential playback samples in O(1).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    /// For `CubicSpline`, laid out as `[in_tangent, value, out_tangent]` per key.
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Keyframe value at `index`, skipping cubic tangents.
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<T> {
        let i = match self.interpolation {
            InterpolationMode::CubicSpline => index * 3 + 1,
            _ => index,
        };
        self.values.get(i).copied()
    }

    /// Samples without a cursor (binary search).
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.times.is_empty() {
            return None;
        }
        let next_idx = self.times.partition_point(|&t| t <= time);
        self.sample_at_frame(next_idx.saturating_sub(1), time)
    }

    /// Samples using `cursor` as a hint, falling back to binary search on jumps.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.times.len();
        if len == 0 {
            return None;
        }
        if len == 1 {
            return self.value_at(0);
        }

        let i = cursor.last_index.min(len - 1);
        let t_curr = self.times[i];

        let found = if time >= t_curr {
            // Forward: normal playback
            (0..=MAX_SCAN_OFFSET).find_map(|offset| {
                let idx = i + offset;
                if idx >= len - 1 {
                    return Some(len - 1);
                }
                (time < self.times[idx + 1]).then_some(idx)
            })
        } else {
            // Backward: loop wrap or reverse playback
            (0..=MAX_SCAN_OFFSET)
                .take_while(|&offset| offset <= i)
                .map(|offset| i - offset)
                .find(|&idx| time >= self.times[idx])
        };

        let index = found.unwrap_or_else(|| {
            self.times
                .partition_point(|&t| t <= time)
                .saturating_sub(1)
        });
        cursor.last_index = index;

        self.sample_at_frame(index, time)
    }

    /// Rewrites every keyframe value with `f`, leaving cubic tangents intact.
    pub(crate) fn map_values(&mut self, mut f: impl FnMut(T) -> T) {
        match self.interpolation {
            InterpolationMode::CubicSpline => {
                for chunk in self.values.chunks_mut(3) {
                    if let Some(v) = chunk.get_mut(1) {
                        *v = f(*v);
                    }
                }
            }
            _ => {
                for v in &mut self.values {
                    *v = f(*v);
                }
            }
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> Option<T> {
        let last = self.times.len().checked_sub(1)?;

        if time <= self.times[0] {
            return self.value_at(0);
        }
        if index >= last {
            return self.value_at(last);
        }

        let next = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next];
        let dt = t1 - t0;
        let t = if dt > 1e-6 { ((time - t0) / dt).clamp(0.0, 1.0) } else { 0.0 };

        match self.interpolation {
            InterpolationMode::Step => self.value_at(index),
            InterpolationMode::Linear => Some(T::interpolate_linear(
                self.value_at(index)?,
                self.value_at(next)?,
                t,
            )),
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next * 3;
                let v0 = *self.values.get(i_prev + 1)?;
                let out0 = *self.values.get(i_prev + 2)?;
                let in1 = *self.values.get(i_next)?;
                let v1 = *self.values.get(i_next + 1)?;
                Some(T::interpolate_cubic(v0, out0, in1, v1, t, dt))
            }
        }
    }
}

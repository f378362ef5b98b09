use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
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

    /// Time of the last keyframe, 0 for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Samples the track at `time`, clamping outside the keyframe range.
    /// `None` for an empty track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        let len = self.times.len().min(self.values.len());
        if len == 0 {
            return None;
        }

        // First keyframe strictly after `time`.
        let next = self.times[..len].partition_point(|&t| t <= time);
        if next == 0 {
            return Some(self.values[0]);
        }
        if next >= len {
            return Some(self.values[len - 1]);
        }

        let prev = next - 1;
        match self.interpolation {
            InterpolationMode::Step => Some(self.values[prev]),
            InterpolationMode::Linear => {
                let t0 = self.times[prev];
                let t1 = self.times[next];
                let span = t1 - t0;
                let alpha = if span > 0.0 { (time - t0) / span } else { 0.0 };
                Some(T::interpolate_linear(
                    self.values[prev],
                    self.values[next],
                    alpha,
                ))
            }
        }
    }
}

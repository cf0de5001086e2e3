use ossa_core::{Interpolatable, OssaError, Result};

use crate::sampler::{self, WrapMode};

/// Tracks at or below this length are searched linearly; longer tracks use
/// binary search. Both strategies return the same index.
pub const LINEAR_SCAN_MAX_KEYS: usize = 16;

/// Ordered `(time, value)` samples for one transform channel of one bone.
///
/// Times are stored separately from values so the key search only touches the
/// `times` array. A track is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T: Interpolatable> {
    times: Vec<f32>,
    values: Vec<T>,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Builds a track, validating that `times` is non-negative, finite and
    /// sorted ascending and that both arrays have the same length.
    pub fn new(times: Vec<f32>, values: Vec<T>) -> Result<Self> {
        if times.len() != values.len() {
            return Err(OssaError::TrackLengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }

        let mut previous = 0.0_f32;
        for (index, &time) in times.iter().enumerate() {
            if !time.is_finite() || time < 0.0 {
                return Err(OssaError::InvalidKeyTime { index, time });
            }
            if index > 0 && time < previous {
                return Err(OssaError::UnsortedKeyframes {
                    index,
                    previous,
                    time,
                });
            }
            previous = time;
        }

        Ok(Self { times, values })
    }

    /// Builds a track from `(time, value)` pairs.
    pub fn from_keyframes(keys: impl IntoIterator<Item = (f32, T)>) -> Result<Self> {
        let (times, values) = keys.into_iter().unzip();
        Self::new(times, values)
    }

    /// A track with no keys; samples to `None` so the channel is left untouched.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            times: Vec::new(),
            values: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[must_use]
    pub fn last_time(&self) -> Option<f32> {
        self.times.last().copied()
    }

    /// Index of the first key whose time is strictly greater than `elapsed`,
    /// or `len()` if there is none.
    #[inline]
    #[must_use]
    pub fn next_key_index(&self, elapsed: f32) -> usize {
        if self.times.len() <= LINEAR_SCAN_MAX_KEYS {
            self.times
                .iter()
                .position(|&t| t > elapsed)
                .unwrap_or(self.times.len())
        } else {
            // partition_point finds the first index where t > elapsed
            self.times.partition_point(|&t| t <= elapsed)
        }
    }

    /// Samples a looping track: past the last key the value interpolates back
    /// towards the first key across the clip boundary.
    #[inline]
    #[must_use]
    pub fn sample(&self, elapsed: f32, duration: f32) -> Option<T> {
        sampler::sample(self, elapsed, duration)
    }

    /// Samples with an explicit wrap mode.
    #[inline]
    #[must_use]
    pub fn sample_with_wrap(&self, elapsed: f32, duration: f32, wrap: WrapMode) -> Option<T> {
        sampler::sample_with_wrap(self, elapsed, duration, wrap)
    }
}

impl<T: Interpolatable> Default for KeyframeTrack<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn rejects_unsorted_times() {
        let err = KeyframeTrack::new(vec![0.0, 1.0, 0.5], vec![0.0_f32, 1.0, 2.0]).unwrap_err();
        assert!(matches!(err, OssaError::UnsortedKeyframes { index: 2, .. }));
    }

    #[test]
    fn rejects_negative_time() {
        let err = KeyframeTrack::new(vec![-0.1], vec![Vec3::ZERO]).unwrap_err();
        assert!(matches!(err, OssaError::InvalidKeyTime { index: 0, .. }));
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = KeyframeTrack::new(vec![0.0, 1.0], vec![1.0_f32]).unwrap_err();
        assert!(matches!(
            err,
            OssaError::TrackLengthMismatch {
                times: 2,
                values: 1
            }
        ));
    }

    #[test]
    fn linear_and_binary_search_agree() {
        let times: Vec<f32> = (0..64).map(|i| i as f32 * 0.25).collect();
        let values: Vec<f32> = times.clone();
        let long = KeyframeTrack::new(times.clone(), values.clone()).unwrap();

        for i in 0..200 {
            let elapsed = i as f32 * 0.083;
            let expected = times.iter().position(|&t| t > elapsed).unwrap_or(times.len());
            assert_eq!(long.next_key_index(elapsed), expected, "elapsed={elapsed}");
        }
    }

    #[test]
    fn duplicate_times_are_allowed() {
        let track = KeyframeTrack::new(vec![0.0, 1.0, 1.0, 2.0], vec![0.0_f32, 1.0, 5.0, 6.0]);
        assert!(track.is_ok());
    }
}

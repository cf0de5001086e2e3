//! Keyframe sampling.
//!
//! Pure functions mapping `(track, elapsed, duration)` to an interpolated
//! value. There is no cursor or cache: the same inputs always produce a
//! bit-identical result, so any number of threads may sample the same track.
//!
//! # Wraparound
//!
//! A looping clip is a ring. When `elapsed` lies past the last key, the
//! segment runs from the last key to the first key of the *next* cycle and its
//! span is `(first.time + duration) - last.time`:
//!
//! ```text
//!   key0        key1               key2 |  (key0 + duration)
//!   |-----------|------------------|----|------|
//!   0                              t2   elapsed  duration
//! ```
//!
//! The interpolation parameter is not clamped; playback keeps `elapsed`
//! inside `[0, duration)` for looping slots, which bounds it to `[0, 1]`.

use ossa_core::Interpolatable;

use crate::track::KeyframeTrack;

/// How sampling treats time outside the keyed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Interpolate across the clip boundary back to the first key.
    #[default]
    Loop,
    /// Hold the first key before it and the last key after it.
    Clamp,
}

/// The pair of keys bracketing a sample time and the blend factor between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeySpan {
    pub prev: usize,
    pub next: usize,
    pub t: f32,
}

impl KeySpan {
    #[inline]
    fn hold(index: usize) -> Self {
        Self {
            prev: index,
            next: index,
            t: 0.0,
        }
    }
}

/// Finds the keys of `track` bracketing `elapsed`.
///
/// Returns `None` for an empty track.
#[must_use]
pub fn locate<T: Interpolatable>(
    track: &KeyframeTrack<T>,
    elapsed: f32,
    duration: f32,
    wrap: WrapMode,
) -> Option<KeySpan> {
    let times = track.times();
    let len = times.len();
    if len == 0 {
        return None;
    }
    if len == 1 {
        return Some(KeySpan::hold(0));
    }

    let n = track.next_key_index(elapsed);

    match wrap {
        WrapMode::Clamp => {
            if n == 0 {
                return Some(KeySpan::hold(0));
            }
            if n == len {
                return Some(KeySpan::hold(len - 1));
            }
            let prev = n - 1;
            let span = times[n] - times[prev];
            Some(KeySpan {
                prev,
                next: n,
                t: (elapsed - times[prev]) / span,
            })
        }
        WrapMode::Loop => {
            let next = if n == len { 0 } else { n };
            let prev = if next == 0 { len - 1 } else { next - 1 };
            let t_prev = times[prev];
            let t_next = times[next];

            let span = if t_next > t_prev {
                t_next - t_prev
            } else {
                (t_next + duration) - t_prev
            };

            // Before the first key: the previous key belongs to the last cycle.
            let local = if n == 0 && elapsed < t_prev {
                elapsed + duration
            } else {
                elapsed
            };

            let t = if span > 0.0 { (local - t_prev) / span } else { 0.0 };
            Some(KeySpan { prev, next, t })
        }
    }
}

/// Samples a looping track. Empty tracks return `None`.
#[inline]
#[must_use]
pub fn sample<T: Interpolatable>(
    track: &KeyframeTrack<T>,
    elapsed: f32,
    duration: f32,
) -> Option<T> {
    sample_with_wrap(track, elapsed, duration, WrapMode::Loop)
}

/// Samples a track using the given wrap mode. Empty tracks return `None`.
#[must_use]
pub fn sample_with_wrap<T: Interpolatable>(
    track: &KeyframeTrack<T>,
    elapsed: f32,
    duration: f32,
    wrap: WrapMode,
) -> Option<T> {
    let span = locate(track, elapsed, duration, wrap)?;
    let values = track.values();
    if span.prev == span.next {
        return Some(values[span.prev]);
    }
    Some(T::interpolate_linear(
        &values[span.prev],
        &values[span.next],
        span.t,
    ))
}

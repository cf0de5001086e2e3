//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`OssaError`] covers every failure that can be detected
//! while *building* animation data:
//! - Malformed keyframe curves (mismatched or missing sibling channels,
//!   non-finite values, zero-length rotations)
//! - Invalid clip parameters (duration, speed)
//! - Skeleton / bind pose inconsistencies
//! - Clip source parsing
//!
//! Playback never fails: invalid runtime selectors are ignored and logged, so
//! none of the per-tick stages return a [`Result`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use ossa_core::errors::{OssaError, Result};
//!
//! fn build_clip() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the Ossa engine.
#[derive(Error, Debug)]
pub enum OssaError {
    // ========================================================================
    // Curve & Track Errors
    // ========================================================================
    /// Sibling channels composing one value (x/y/z or x/y/z/w) have different
    /// sample counts.
    #[error(
        "{group} curves of '{bone_path}' are not the same length: \
         {channel} has {found} keys, expected {expected}"
    )]
    ChannelLengthMismatch {
        bone_path: String,
        group: &'static str,
        channel: &'static str,
        expected: usize,
        found: usize,
    },

    /// A channel group is only partially present (e.g. `position.x` without `position.y`).
    #[error("{group} curves of '{bone_path}' are missing channel {channel}")]
    MissingChannel {
        bone_path: String,
        group: &'static str,
        channel: &'static str,
    },

    /// The same bone path / channel pair was supplied twice.
    #[error("Duplicate curve for '{bone_path}' channel {channel}")]
    DuplicateCurve {
        bone_path: String,
        channel: &'static str,
    },

    /// A curve value is NaN or infinite.
    #[error("Invalid value in '{bone_path}' channel {channel} at key {index}")]
    InvalidKeyValue {
        bone_path: String,
        channel: &'static str,
        index: usize,
    },

    /// A rotation key is too close to zero length to normalize.
    #[error("Rotation key {index} of '{bone_path}' has near-zero length")]
    DegenerateRotation { bone_path: String, index: usize },

    /// Keyframe time and value arrays differ in length.
    #[error("Track length mismatch: {times} times, {values} values")]
    TrackLengthMismatch { times: usize, values: usize },

    /// Keyframe times are not sorted ascending.
    #[error("Keyframes not sorted: key {index} at {time} precedes previous key at {previous}")]
    UnsortedKeyframes {
        index: usize,
        previous: f32,
        time: f32,
    },

    /// A keyframe time is negative or not finite.
    #[error("Invalid keyframe time {time} at index {index}")]
    InvalidKeyTime { index: usize, time: f32 },

    // ========================================================================
    // Clip Errors
    // ========================================================================
    /// Clip duration must be finite and strictly positive.
    #[error("Clip '{clip}' has invalid duration {duration}")]
    InvalidDuration { clip: String, duration: f32 },

    /// Clip default speed must be finite.
    #[error("Clip '{clip}' has invalid speed {speed}")]
    InvalidSpeed { clip: String, speed: f32 },

    /// Clip source JSON could not be parsed.
    #[error("Clip source parse error: {0}")]
    ClipSourceParse(#[from] serde_json::Error),

    /// Animation settings JSON could not be parsed.
    #[error("Invalid animation settings: {0}")]
    InvalidSettings(#[source] serde_json::Error),

    // ========================================================================
    // Skinning Errors
    // ========================================================================
    /// Bone list and bind pose list differ in length.
    #[error("Skeleton '{skeleton}' has {bones} bones but {bind_poses} bind poses")]
    BindPoseCountMismatch {
        skeleton: String,
        bones: usize,
        bind_poses: usize,
    },

    /// A skeleton was created without any bones.
    #[error("Skeleton '{0}' has no bones")]
    EmptySkeleton(String),
}

/// Alias for `Result<T, OssaError>`.
pub type Result<T> = std::result::Result<T, OssaError>;

//! Animation Settings
//!
//! Tunables shared by the pose, drive and skin stages.
//!
//! ```rust,ignore
//! use ossa::animation::AnimationSettings;
//!
//! let settings = AnimationSettings {
//!     max_delta_time: Some(1.0 / 15.0),
//!     ..Default::default()
//! };
//! ```

use ossa_core::{OssaError, Result};
use serde::{Deserialize, Serialize};

/// Default worklist length below which stages run on the calling thread.
pub const DEFAULT_PARALLEL_MIN_LEN: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Upper bound applied to each tick's delta time. `None` disables the
    /// clamp, which is the default. Useful to stop a long frame hitch from
    /// skipping most of a transition.
    pub max_delta_time: Option<f32>,

    /// Minimum number of work items before a stage is dispatched to the rayon
    /// pool. Ignored without the `parallel` feature.
    pub parallel_min_len: usize,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            max_delta_time: None,
            parallel_min_len: DEFAULT_PARALLEL_MIN_LEN,
        }
    }
}

impl AnimationSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(OssaError::InvalidSettings)
    }

    /// Applies the delta-time clamp.
    #[inline]
    #[must_use]
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        match self.max_delta_time {
            Some(max) if dt > max => max,
            _ => dt,
        }
    }

    /// Whether a worklist of `len` items should be processed in parallel.
    #[inline]
    #[must_use]
    pub fn use_parallel(&self, len: usize) -> bool {
        cfg!(feature = "parallel") && len >= self.parallel_min_len
    }
}

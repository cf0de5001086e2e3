use glam::{Quat, Vec3};
use ossa_core::{OssaError, Result};

use crate::track::KeyframeTrack;

/// Transform tracks for one bone slot of one clip.
///
/// Any of the tracks may be empty, meaning the clip does not animate that
/// channel of the bone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneTracks {
    pub position: KeyframeTrack<Vec3>,
    pub rotation: KeyframeTrack<Quat>,
    pub scale: KeyframeTrack<Vec3>,
}

impl BoneTracks {
    #[must_use]
    pub fn new(position: KeyframeTrack<Vec3>, rotation: KeyframeTrack<Quat>) -> Self {
        Self {
            position,
            rotation,
            scale: KeyframeTrack::empty(),
        }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: KeyframeTrack<Vec3>) -> Self {
        self.scale = scale;
        self
    }

    /// Latest key time across all channels.
    #[must_use]
    pub fn last_time(&self) -> f32 {
        [
            self.position.last_time(),
            self.rotation.last_time(),
            self.scale.last_time(),
        ]
        .into_iter()
        .flatten()
        .fold(0.0_f32, f32::max)
    }
}

/// Immutable keyframe data for one clip.
///
/// Bone slots are dense indices fixed at build time; every entity that plays
/// this clip maps its bones to these slots. Stores are shared read-only behind
/// an `Arc` and are never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipStore {
    name: String,
    duration: f32,
    default_speed: f32,
    bones: Vec<BoneTracks>,
}

impl ClipStore {
    pub fn new(
        name: impl Into<String>,
        duration: f32,
        default_speed: f32,
        bones: Vec<BoneTracks>,
    ) -> Result<Self> {
        let name = name.into();
        if !duration.is_finite() || duration <= 0.0 {
            return Err(OssaError::InvalidDuration {
                clip: name,
                duration,
            });
        }
        if !default_speed.is_finite() {
            return Err(OssaError::InvalidSpeed {
                clip: name,
                speed: default_speed,
            });
        }

        let last_key = bones.iter().map(BoneTracks::last_time).fold(0.0_f32, f32::max);
        if last_key > duration {
            log::warn!("Clip '{name}' has keys at {last_key:.3}s past its {duration:.3}s duration");
        }

        Ok(Self {
            name,
            duration,
            default_speed,
            bones,
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn default_speed(&self) -> f32 {
        self.default_speed
    }

    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, slot: usize) -> Option<&BoneTracks> {
        self.bones.get(slot)
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[BoneTracks] {
        &self.bones
    }
}

//! Pose blending.
//!
//! Samples every active clip of a [`PlaybackState`] for one bound bone and
//! combines the results. While a transition runs, the current clip's sample is
//! blended toward the incoming clip's sample by the transition progress:
//! position and scale with `lerp`, rotation with shortest-path `slerp`.

use glam::{Quat, Vec3};
use ossa_core::{Interpolatable, LocalTransform};

use crate::binding::BoneBinding;
use crate::clip::BoneTracks;
use crate::library::ClipLibrary;
use crate::playback::{ClipPlayback, PlaybackState};

/// Blended local pose of one bone. `None` channels leave the bone untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BonePose {
    pub position: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
}

impl BonePose {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.rotation.is_none() && self.scale.is_none()
    }

    /// Writes the sampled channels into `transform` and marks it dirty if
    /// anything was written.
    pub fn apply_to(&self, transform: &mut LocalTransform) {
        if self.is_empty() {
            return;
        }
        if let Some(position) = self.position {
            transform.position = position;
        }
        if let Some(rotation) = self.rotation {
            transform.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            transform.scale = scale;
        }
        transform.mark_dirty();
    }
}

#[inline]
fn blend_channel<T: Interpolatable>(from: Option<T>, to: Option<T>, t: f32) -> Option<T> {
    match (from, to) {
        (Some(a), Some(b)) => Some(T::interpolate_linear(&a, &b, t)),
        (a, b) => a.or(b),
    }
}

#[inline]
fn sample_bone(tracks: &BoneTracks, playback: &ClipPlayback) -> BonePose {
    let wrap = playback.wrap_mode();
    BonePose {
        position: tracks
            .position
            .sample_with_wrap(playback.elapsed, playback.duration, wrap),
        rotation: tracks
            .rotation
            .sample_with_wrap(playback.elapsed, playback.duration, wrap),
        scale: tracks
            .scale
            .sample_with_wrap(playback.elapsed, playback.duration, wrap),
    }
}

/// Samples one slot. A bone the clip does not animate gives an empty pose.
fn sample_slot(binding: &BoneBinding, playback: &ClipPlayback, clips: &ClipLibrary) -> BonePose {
    binding
        .slot(playback.clip)
        .and_then(|slot| clips.clip(playback.clip)?.bone(slot))
        .map(|tracks| sample_bone(tracks, playback))
        .unwrap_or_default()
}

/// Computes the blended pose of one bone for the state's active clips.
///
/// Uses the state as it is before this tick's drive step.
#[must_use]
pub fn pose(binding: &BoneBinding, state: &PlaybackState, clips: &ClipLibrary) -> BonePose {
    let mut slots = state.active_slots().iter();
    let Some(current) = slots.next() else {
        return BonePose::default();
    };

    let mut result = sample_slot(binding, current, clips);

    if let Some(next) = slots.next() {
        let incoming = sample_slot(binding, next, clips);
        let t = state.transition_progress();
        result = BonePose {
            position: blend_channel(result.position, incoming.position, t),
            rotation: blend_channel(result.rotation, incoming.rotation, t),
            scale: blend_channel(result.scale, incoming.scale, t),
        };
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Binder;
    use crate::builder::ClipBuilder;
    use ossa_core::BoneHandle;
    use rustc_hash::FxHashMap;
    use slotmap::SlotMap;

    fn setup() -> (ClipLibrary, BoneBinding, BoneBinding) {
        let mut clips = ClipLibrary::new();

        let mut a = ClipBuilder::new("a", 1.0);
        a.add_position_keys("root", &[(0.0, Vec3::ZERO), (1.0, Vec3::ZERO)])
            .unwrap();
        clips.push_builder(a).unwrap();

        let mut b = ClipBuilder::new("b", 1.0);
        b.add_position_keys("root", &[(0.0, Vec3::X * 10.0), (1.0, Vec3::X * 10.0)])
            .unwrap();
        b.add_rotation_keys("arm", &[(0.0, Quat::from_rotation_z(1.0))])
            .unwrap();
        clips.push_builder(b).unwrap();

        let mut bones: SlotMap<BoneHandle, ()> = SlotMap::with_key();
        let mut names: FxHashMap<String, BoneHandle> = FxHashMap::default();
        names.insert("root".into(), bones.insert(()));
        names.insert("arm".into(), bones.insert(()));

        let mut bindings = Binder::bind(&names, &clips).into_iter();
        let root = bindings.next().unwrap();
        let arm = bindings.next().unwrap();
        (clips, root, arm)
    }

    #[test]
    fn blends_by_transition_progress() {
        let (clips, root, _) = setup();
        let mut state = PlaybackState::autoplay(&clips);
        state.cross_fade(&clips, 1, 1.0, true);
        state.advance(0.25);

        let pose = pose(&root, &state, &clips);
        assert!((pose.position.unwrap().x - 2.5).abs() < 1e-5);
        assert_eq!(pose.rotation, None);
    }

    #[test]
    fn one_sided_channel_uses_available_sample() {
        let (clips, _, arm) = setup();
        let mut state = PlaybackState::autoplay(&clips);
        state.cross_fade(&clips, 1, 1.0, true);
        state.advance(0.1);

        let pose = pose(&arm, &state, &clips);
        let rotation = pose.rotation.unwrap();
        assert!(rotation.abs_diff_eq(Quat::from_rotation_z(1.0), 1e-5));
    }

    #[test]
    fn unanimated_bone_is_left_untouched() {
        let (clips, _, arm) = setup();
        let state = PlaybackState::autoplay(&clips);
        let pose = pose(&arm, &state, &clips);
        assert!(pose.is_empty());

        let mut transform = LocalTransform::from_translation(Vec3::Y);
        pose.apply_to(&mut transform);
        assert_eq!(transform.position, Vec3::Y);
    }
}

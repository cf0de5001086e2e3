use std::sync::Arc;

use ossa_core::{AnimatorKey, LocalTransform};
use slotmap::SlotMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::binding::BoneBinding;
use crate::blend;
use crate::library::ClipLibrary;
use crate::playback::PlaybackState;
use crate::settings::AnimationSettings;

/// One animated instance: a shared clip library plus its own playback state.
#[derive(Debug, Clone)]
pub struct Animator {
    clips: Arc<ClipLibrary>,
    pub state: PlaybackState,
}

impl Animator {
    /// Creates an animator already playing clip 0 on loop.
    #[must_use]
    pub fn new(clips: Arc<ClipLibrary>) -> Self {
        let state = PlaybackState::autoplay(&clips);
        Self { clips, state }
    }

    /// Creates an animator with no clip assigned.
    #[must_use]
    pub fn idle(clips: Arc<ClipLibrary>) -> Self {
        Self {
            clips,
            state: PlaybackState::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn clips(&self) -> &Arc<ClipLibrary> {
        &self.clips
    }

    pub fn play(&mut self, index: usize, looping: bool) -> bool {
        self.state.play(&self.clips, index, looping)
    }

    pub fn cross_fade(&mut self, index: usize, duration: f32, looping: bool) -> bool {
        self.state.cross_fade(&self.clips, index, duration, looping)
    }

    pub fn cross_fade_if_changed(&mut self, index: usize, duration: f32, looping: bool) -> bool {
        self.state
            .cross_fade_if_changed(&self.clips, index, duration, looping)
    }

    /// Looks up a clip by name and starts it.
    pub fn play_named(&mut self, name: &str, looping: bool) -> bool {
        match self.clips.find(name) {
            Some(index) => self.play(index, looping),
            None => {
                log::debug!("play_named: no clip called '{name}'");
                false
            }
        }
    }

    pub fn pause(&mut self) {
        self.state.pause();
    }

    pub fn resume(&mut self) {
        self.state.resume();
    }
}

/// A bound bone driven by one animator.
#[derive(Debug, Clone)]
pub struct AnimatedBone {
    pub animator: AnimatorKey,
    pub binding: BoneBinding,
}

/// Runs the per-tick animation stages over every animator.
///
/// Each tick first blends poses from the state as it stands, then advances
/// the playback clocks. Both stages touch each instance independently and
/// are dispatched to rayon for large worklists.
pub struct AnimationSystem;

impl AnimationSystem {
    /// Pose stage: writes the blended pose of `bones[i]` into `poses[i]`.
    ///
    /// Bones whose animator is paused, idle or despawned are left untouched.
    pub fn pose_blend(
        animators: &SlotMap<AnimatorKey, Animator>,
        bones: &[AnimatedBone],
        poses: &mut [LocalTransform],
        settings: &AnimationSettings,
    ) {
        debug_assert_eq!(bones.len(), poses.len());

        let apply = |bone: &AnimatedBone, pose: &mut LocalTransform| {
            let Some(animator) = animators.get(bone.animator) else {
                return;
            };
            if !animator.state.is_playing() {
                return;
            }
            blend::pose(&bone.binding, &animator.state, &animator.clips).apply_to(pose);
        };

        #[cfg(feature = "parallel")]
        if settings.use_parallel(bones.len()) {
            bones
                .par_iter()
                .zip(poses.par_iter_mut())
                .for_each(|(bone, pose)| apply(bone, pose));
            return;
        }

        #[cfg(not(feature = "parallel"))]
        let _ = settings;

        for (bone, pose) in bones.iter().zip(poses.iter_mut()) {
            apply(bone, pose);
        }
    }

    /// Drive stage: advances every animator by `dt` (after the settings clamp).
    pub fn drive(
        animators: &mut SlotMap<AnimatorKey, Animator>,
        dt: f32,
        settings: &AnimationSettings,
    ) {
        let dt = settings.clamp_delta(dt);

        #[cfg(feature = "parallel")]
        if settings.use_parallel(animators.len()) {
            animators
                .values_mut()
                .par_bridge()
                .for_each(|animator| animator.state.advance(dt));
            return;
        }

        for animator in animators.values_mut() {
            animator.state.advance(dt);
        }
    }

    /// Pose stage followed by drive stage.
    pub fn tick(
        animators: &mut SlotMap<AnimatorKey, Animator>,
        bones: &[AnimatedBone],
        poses: &mut [LocalTransform],
        dt: f32,
        settings: &AnimationSettings,
    ) {
        Self::pose_blend(animators, bones, poses, settings);
        Self::drive(animators, dt, settings);
    }
}

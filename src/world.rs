//! Reference Host
//!
//! [`AnimationWorld`] owns everything the three per-tick stages operate on and
//! runs them in the required order:
//!
//! 1. pose blend (reads pre-advance playback state, writes bone poses)
//! 2. drive (advances playback state)
//! 3. skin-matrix build, once the caller has propagated world transforms
//!
//! Hierarchy propagation itself is left to the caller: read [`poses`], compute
//! world matrices, then hand them to [`update_skin_matrices`].
//!
//! [`poses`]: AnimationWorld::poses
//! [`update_skin_matrices`]: AnimationWorld::update_skin_matrices

use std::sync::Arc;

use ossa_animation::{
    AnimatedBone, AnimationSettings, AnimationSystem, Animator, Binder, BoneResolver, ClipLibrary,
};
use ossa_core::{AnimatorKey, BoneHandle, LocalTransform, SkinKey};
use ossa_skinning::{Skeleton, SkinningSystem, WorldTransformSource};
use slotmap::SlotMap;

#[derive(Debug, Default)]
pub struct AnimationWorld {
    pub settings: AnimationSettings,
    animators: SlotMap<AnimatorKey, Animator>,
    skeletons: SlotMap<SkinKey, Skeleton>,

    // bones[i] drives poses[i]
    bones: Vec<AnimatedBone>,
    poses: Vec<LocalTransform>,
}

impl AnimationWorld {
    #[must_use]
    pub fn new(settings: AnimationSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    // ========================================================================
    // Animators
    // ========================================================================

    /// Spawns an animator that starts playing clip 0 on loop.
    pub fn spawn_animator(&mut self, clips: Arc<ClipLibrary>) -> AnimatorKey {
        self.animators.insert(Animator::new(clips))
    }

    /// Removes an animator together with every bone it drives.
    pub fn despawn_animator(&mut self, key: AnimatorKey) -> Option<Animator> {
        let animator = self.animators.remove(key)?;

        let mut i = 0;
        while i < self.bones.len() {
            if self.bones[i].animator == key {
                self.bones.swap_remove(i);
                self.poses.swap_remove(i);
            } else {
                i += 1;
            }
        }

        Some(animator)
    }

    #[inline]
    #[must_use]
    pub fn animator(&self, key: AnimatorKey) -> Option<&Animator> {
        self.animators.get(key)
    }

    #[inline]
    pub fn animator_mut(&mut self, key: AnimatorKey) -> Option<&mut Animator> {
        self.animators.get_mut(key)
    }

    pub fn animators(&self) -> impl Iterator<Item = (AnimatorKey, &Animator)> {
        self.animators.iter()
    }

    pub fn animators_mut(&mut self) -> impl Iterator<Item = (AnimatorKey, &mut Animator)> {
        self.animators.iter_mut()
    }

    #[inline]
    #[must_use]
    pub fn animator_count(&self) -> usize {
        self.animators.len()
    }

    // ========================================================================
    // Bones
    // ========================================================================

    /// Binds the hierarchy seen through `resolver` to an animator. Bound bones
    /// start from the identity pose. Returns the number of bones bound.
    pub fn attach(&mut self, key: AnimatorKey, resolver: &impl BoneResolver) -> usize {
        self.attach_with_rest_pose(key, resolver, |_| LocalTransform::IDENTITY)
    }

    /// Like [`attach`](Self::attach), seeding each bone's pose from
    /// `rest_pose`. Channels no clip animates keep that value.
    pub fn attach_with_rest_pose(
        &mut self,
        key: AnimatorKey,
        resolver: &impl BoneResolver,
        rest_pose: impl Fn(BoneHandle) -> LocalTransform,
    ) -> usize {
        let Some(animator) = self.animators.get(key) else {
            log::warn!("attach: animator {key:?} does not exist");
            return 0;
        };

        let bindings = Binder::bind(resolver, animator.clips());
        let count = bindings.len();
        for binding in bindings {
            self.poses.push(rest_pose(binding.bone));
            self.bones.push(AnimatedBone {
                animator: key,
                binding,
            });
        }

        log::debug!("Attached {count} bones to animator {key:?}");
        count
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[AnimatedBone] {
        &self.bones
    }

    /// Current local pose of every bound bone, indexed like [`bones`](Self::bones).
    #[inline]
    #[must_use]
    pub fn poses(&self) -> &[LocalTransform] {
        &self.poses
    }

    #[inline]
    pub fn poses_mut(&mut self) -> &mut [LocalTransform] {
        &mut self.poses
    }

    pub fn bone_poses(&self) -> impl Iterator<Item = (BoneHandle, &LocalTransform)> {
        self.bones.iter().map(|b| b.binding.bone).zip(&self.poses)
    }

    /// Pose of the first binding of `bone`.
    #[must_use]
    pub fn pose_of(&self, bone: BoneHandle) -> Option<&LocalTransform> {
        self.bone_poses()
            .find_map(|(handle, pose)| (handle == bone).then_some(pose))
    }

    // ========================================================================
    // Skeletons
    // ========================================================================

    pub fn add_skeleton(&mut self, skeleton: Skeleton) -> SkinKey {
        self.skeletons.insert(skeleton)
    }

    pub fn remove_skeleton(&mut self, key: SkinKey) -> Option<Skeleton> {
        self.skeletons.remove(key)
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self, key: SkinKey) -> Option<&Skeleton> {
        self.skeletons.get(key)
    }

    // ========================================================================
    // Stages
    // ========================================================================

    /// Pose stage then drive stage.
    pub fn tick(&mut self, dt: f32) {
        AnimationSystem::tick(
            &mut self.animators,
            &self.bones,
            &mut self.poses,
            dt,
            &self.settings,
        );
    }

    /// Skin stage. Call after world transforms for this frame are resolved.
    /// Returns the number of skeletons updated.
    pub fn update_skin_matrices<W>(&mut self, world: &W) -> usize
    where
        W: WorldTransformSource + Sync,
    {
        SkinningSystem::update(&mut self.skeletons, world, self.settings.parallel_min_len)
    }
}

use glam::Mat4;
use ossa_core::{BoneHandle, OssaError, Result};

use crate::skin_matrix::{SkinMatrix, skin_matrix};
use crate::world::WorldTransformSource;

/// One skinned root: its bones, their bind poses and the skin-matrix buffer.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,

    /// Node whose world transform defines the space skin matrices live in.
    pub root: BoneHandle,

    // === Core Data ===
    // bones[i] corresponds to joint i in the deformation consumer.
    bones: Vec<BoneHandle>,

    // Static after creation. Maps bind-pose vertices into each bone's local
    // space (the inverse of the bone's world transform at rest).
    bind_poses: Vec<Mat4>,

    // === Runtime Data ===
    // Recomputed every visual frame, read by the deformation consumer.
    skin_matrices: Vec<SkinMatrix>,
}

impl Skeleton {
    pub fn new(
        name: impl Into<String>,
        root: BoneHandle,
        bones: Vec<BoneHandle>,
        bind_poses: Vec<Mat4>,
    ) -> Result<Self> {
        let name = name.into();
        if bones.is_empty() {
            return Err(OssaError::EmptySkeleton(name));
        }
        if bones.len() != bind_poses.len() {
            return Err(OssaError::BindPoseCountMismatch {
                skeleton: name,
                bones: bones.len(),
                bind_poses: bind_poses.len(),
            });
        }

        let count = bones.len();
        Ok(Self {
            name,
            root,
            bones,
            bind_poses,
            skin_matrices: vec![SkinMatrix::IDENTITY; count],
        })
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[BoneHandle] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bind_poses(&self) -> &[Mat4] {
        &self.bind_poses
    }

    #[inline]
    #[must_use]
    pub fn skin_matrices(&self) -> &[SkinMatrix] {
        &self.skin_matrices
    }

    /// The skin-matrix buffer as raw bytes, ready for upload.
    #[inline]
    #[must_use]
    pub fn skin_matrix_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.skin_matrices)
    }

    /// Recomputes every skin matrix from the current world transforms.
    ///
    /// Must run after world transforms have been propagated for this frame.
    /// Bones missing from `world` keep their previous matrix. Returns `false`
    /// (and writes nothing) if the root itself is missing.
    pub fn compute_skin_matrices(&mut self, world: &impl WorldTransformSource) -> bool {
        let Some(root_world) = world.world_matrix(self.root) else {
            log::warn!("Skeleton '{}': root has no world transform, skipping", self.name);
            return false;
        };
        let root_inverse = root_world.inverse();

        for ((&bone, bind_pose), out) in self
            .bones
            .iter()
            .zip(&self.bind_poses)
            .zip(self.skin_matrices.iter_mut())
        {
            let Some(bone_world) = world.world_matrix(bone) else {
                log::trace!("Skeleton '{}': bone {bone:?} has no world transform", self.name);
                continue;
            };
            *out = skin_matrix(&root_inverse, &bone_world, bind_pose);
        }

        true
    }
}

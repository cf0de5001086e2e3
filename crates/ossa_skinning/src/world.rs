use glam::{Affine3A, Mat4};
use ossa_core::BoneHandle;
use slotmap::{SecondaryMap, SlotMap};

/// Read access to resolved world transforms.
///
/// Implemented by whatever propagates local transforms through the hierarchy.
/// Must be fully up to date for the frame before skin matrices are built.
pub trait WorldTransformSource {
    fn world_matrix(&self, bone: BoneHandle) -> Option<Mat4>;
}

impl WorldTransformSource for SlotMap<BoneHandle, Mat4> {
    #[inline]
    fn world_matrix(&self, bone: BoneHandle) -> Option<Mat4> {
        self.get(bone).copied()
    }
}

impl WorldTransformSource for SecondaryMap<BoneHandle, Mat4> {
    #[inline]
    fn world_matrix(&self, bone: BoneHandle) -> Option<Mat4> {
        self.get(bone).copied()
    }
}

impl WorldTransformSource for SecondaryMap<BoneHandle, Affine3A> {
    #[inline]
    fn world_matrix(&self, bone: BoneHandle) -> Option<Mat4> {
        self.get(bone).map(|m| Mat4::from(*m))
    }
}

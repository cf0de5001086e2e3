//! Ossa Skinning
//!
//! Turns resolved bone world transforms into root-relative skin matrices:
//! `skin = inverse(root_world) * bone_world * bind_pose`, stored as packed
//! 3×4 [`SkinMatrix`] values for GPU upload.

pub mod skeleton;
pub mod skin_matrix;
pub mod system;
pub mod world;

pub use skeleton::Skeleton;
pub use skin_matrix::{SkinMatrix, build_skin_matrices, skin_matrix};
pub use system::SkinningSystem;
pub use world::WorldTransformSource;

//! Ossa Core
//!
//! Foundational types shared by every Ossa crate:
//!
//! - [`errors`]: the [`OssaError`] type and [`Result`] alias
//! - [`values`]: the [`Interpolatable`] trait (lerp / shortest-path slerp)
//! - [`interner`]: bone-path string interning for build-time lookups
//! - [`transform`]: [`LocalTransform`], the per-bone pose written by animation
//! - [`time`]: a frame [`Timer`] for hosts
//!
//! Stable handles ([`BoneHandle`], [`AnimatorKey`], [`SkinKey`]) are slotmap
//! keys so that hosts can store bones, animators and skinned roots in dense
//! arenas and hand out copyable references.

pub mod errors;
pub mod interner;
pub mod time;
pub mod transform;
pub mod values;

pub use errors::{OssaError, Result};
pub use interner::Symbol;
pub use time::Timer;
pub use transform::LocalTransform;
pub use values::Interpolatable;

use slotmap::new_key_type;

new_key_type! {
    /// A bone node owned by the host scene.
    pub struct BoneHandle;
    /// One animated instance (its playback state and clip library).
    pub struct AnimatorKey;
    /// One skinned root and its skin-matrix buffer.
    pub struct SkinKey;
}

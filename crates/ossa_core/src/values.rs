use glam::{Quat, Vec3};

/// Values that can be stored in a keyframe track and blended between poses.
///
/// Implementations must be pure: identical inputs always produce a
/// bit-identical result.
pub trait Interpolatable: Copy + Clone + Sized + Send + Sync + 'static {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    #[inline]
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    #[inline]
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start.lerp(*end, t)
    }
}

impl Interpolatable for Quat {
    /// Shortest-path spherical interpolation.
    ///
    /// `glam` flips `end` when the dot product is negative, so the result never
    /// takes the long way around the hypersphere.
    #[inline]
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start.slerp(*end, t)
    }
}

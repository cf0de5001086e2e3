use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Root-relative skin matrix of one bone.
///
/// The upper 3×4 block of a 4×4 affine matrix, stored column-major: three
/// basis columns followed by the translation column. The implicit last row is
/// `[0, 0, 0, 1]`. The layout is `#[repr(C)]` and `Pod` so a skin-matrix
/// buffer can be uploaded as raw bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SkinMatrix {
    pub cols: [[f32; 3]; 4],
}

impl Default for SkinMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl SkinMatrix {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
        ],
    };

    /// Keeps the upper three rows of `m`. The bottom row is discarded.
    #[inline]
    #[must_use]
    pub fn from_mat4(m: &Mat4) -> Self {
        Self {
            cols: [
                m.x_axis.truncate().to_array(),
                m.y_axis.truncate().to_array(),
                m.z_axis.truncate().to_array(),
                m.w_axis.truncate().to_array(),
            ],
        }
    }

    /// Expands back to a 4×4 matrix with the affine bottom row.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        let [x, y, z, w] = self.cols.map(Vec3::from_array);
        Mat4::from_cols(x.extend(0.0), y.extend(0.0), z.extend(0.0), w.extend(1.0))
    }

    #[inline]
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        Vec3::from_array(self.cols[3])
    }

    /// Transforms a point (w = 1).
    #[must_use]
    pub fn transform_point3(&self, p: Vec3) -> Vec3 {
        self.to_mat4().mul_vec4(Vec4::new(p.x, p.y, p.z, 1.0)).truncate()
    }
}

/// Computes one skin matrix: `root_inverse * bone_world * bind_pose`.
#[inline]
#[must_use]
pub fn skin_matrix(root_inverse: &Mat4, bone_world: &Mat4, bind_pose: &Mat4) -> SkinMatrix {
    SkinMatrix::from_mat4(&(*root_inverse * *bone_world * *bind_pose))
}

/// Builds the skin matrix of every bone slot into `out`.
///
/// `bone_worlds`, `bind_poses` and `out` are indexed by bone slot; only the
/// common prefix of the three slices is written. `root_world` must be
/// invertible: a degenerate root produces non-finite matrices and is not
/// checked for.
pub fn build_skin_matrices(
    root_world: &Mat4,
    bone_worlds: &[Mat4],
    bind_poses: &[Mat4],
    out: &mut [SkinMatrix],
) {
    let root_inverse = root_world.inverse();
    for ((bone_world, bind_pose), slot) in bone_worlds.iter().zip(bind_poses).zip(out.iter_mut()) {
        *slot = skin_matrix(&root_inverse, bone_world, bind_pose);
    }
}

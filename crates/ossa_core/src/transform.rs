use glam::{Affine3A, Mat4, Quat, Vec3};

/// 骨骼局部变换 (Local Transform)
///
/// 动画姿态阶段的输出：每根骨骼的 TRS。
/// 附带矩阵缓存和脏检查，外部的变换传播阶段可以跳过未变化的骨骼。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    // === 矩阵缓存 ===
    local_matrix: Affine3A,

    // === 脏检查状态 ===
    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl LocalTransform {
    pub const IDENTITY: Self = Self::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);

    #[must_use]
    pub const fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            local_matrix: Affine3A::IDENTITY,
            last_position: position,
            last_rotation: rotation,
            last_scale: scale,
            force_update: true,
        }
    }

    #[must_use]
    pub fn from_translation(position: Vec3) -> Self {
        Self::from_trs(position, Quat::IDENTITY, Vec3::ONE)
    }

    /// 检查并更新局部矩阵
    /// 返回值: bool (是否发生了变化)
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix = self.to_affine();

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// 直接由 TRS 计算，不读取缓存
    #[inline]
    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    #[inline]
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// 获取缓存的局部矩阵（需先调用 `update_local_matrix`）
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    /// 手动标记脏（例如用于强制刷新）
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

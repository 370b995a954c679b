//! Transform component and the GPU instance matrix built from it.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position, yaw (rotation about +Y) and uniform scale.
    pub fn from_position_yaw_scale(position: Vec3, yaw: f32, scale: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw),
            scale: Vec3::splat(scale),
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Local +Z axis in world space. Props and creatures are modelled facing +Z.
    pub fn facing(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Rotate so the local +Z axis points at `target`, keeping +Y as up.
    ///
    /// Leaves the rotation untouched when the target coincides with the position
    /// or lies straight above/below it.
    pub fn face_towards(&mut self, target: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() < 1e-8 {
            return;
        }
        let z = forward.normalize();
        let x = Vec3::Y.cross(z);
        if x.length_squared() < 1e-8 {
            return;
        }
        let x = x.normalize();
        let y = z.cross(x);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(x, y, z));
    }
}

/// Raw transform data for GPU upload (instance data).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Transform> for TransformRaw {
    fn from(transform: &Transform) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
        }
    }
}

impl From<Transform> for TransformRaw {
    fn from(transform: Transform) -> Self {
        Self::from(&transform)
    }
}

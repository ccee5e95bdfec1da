//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the owner `Transform` that collision
//! volumes are rebuilt from.

pub use nalgebra::{Matrix4, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Position, rotation and scale of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Builder-style uniform scale
    #[must_use]
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::repeat(scale);
        self
    }

    /// World matrix: scale, then rotate, then translate
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Unit direction the entity faces (local +Z rotated into world space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::z()
    }
}

/// Translation column of an affine world matrix
pub fn matrix_translation(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Per-axis scale of an affine world matrix (length of each basis column)
pub fn matrix_scale(matrix: &Mat4) -> Vec3 {
    Vec3::new(
        Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude(),
        Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude(),
        Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_matrix_round_trips_translation_and_scale() {
        let transform = Transform::from_position_rotation(
            Vec3::new(3.0, -2.0, 7.5),
            Quat::from_axis_angle(&Vec3::y_axis(), 0.7),
        )
        .with_uniform_scale(2.5);

        let matrix = transform.to_matrix();

        assert_relative_eq!(matrix_translation(&matrix), transform.position, epsilon = EPSILON);
        assert_relative_eq!(matrix_scale(&matrix), Vec3::repeat(2.5), epsilon = 1e-5);
    }

    #[test]
    fn test_forward_follows_rotation() {
        let identity = Transform::identity();
        assert_relative_eq!(identity.forward(), Vec3::z(), epsilon = EPSILON);

        let turned = Transform::from_position_rotation(
            Vec3::zeros(),
            Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2),
        );
        assert_relative_eq!(turned.forward(), Vec3::x(), epsilon = 1e-6);
    }
}

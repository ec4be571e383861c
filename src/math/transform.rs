use crate::math::{Vector3, Matrix3, Matrix4, Quaternion};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A body pose: position, orientation and per-axis scale
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Position in world space
    pub position: Vector3,

    /// Orientation as a unit quaternion
    pub rotation: Quaternion,

    /// Scale in each object-space axis
    pub scale: Vector3,
}

impl Transform {
    /// Creates a new transform with the given position, rotation, and scale
    #[inline]
    pub fn new(position: Vector3, rotation: Quaternion, scale: Vector3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Creates a new identity transform (no translation, no rotation, unit scale)
    #[inline]
    pub fn identity() -> Self {
        Self::from_position(Vector3::zero())
    }

    /// Creates a new transform from just a position
    #[inline]
    pub fn from_position(position: Vector3) -> Self {
        Self {
            position,
            rotation: Quaternion::identity(),
            scale: Vector3::one(),
        }
    }

    /// Returns a copy with a different scale
    #[inline]
    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    /// Returns a copy with a different orientation
    #[inline]
    pub fn with_rotation(mut self, rotation: Quaternion) -> Self {
        self.rotation = rotation;
        self
    }

    /// Model matrix `T * R * S` for the renderer
    pub fn to_matrix(&self) -> Matrix4 {
        let rotation = self.rotation.to_rotation_matrix();
        let linear = rotation * Matrix3::from_diagonal(self.scale);
        Matrix4::from_linear_translation(linear, self.position)
    }

    /// Transforms an object-space point the way the renderer does (scale, rotate, translate)
    #[inline]
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        self.rotation.rotate_vector(point.component_mul(&self.scale)) + self.position
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn model_matrix_matches_transform_point() {
        let transform = Transform::new(
            Vector3::new(1.0, -2.0, 0.5),
            Quaternion::from_axis_angle(Vector3::new(0.0, 1.0, 1.0), 0.9),
            Vector3::new(2.0, 0.5, 1.5),
        );
        let p = Vector3::new(0.3, 0.7, -1.1);
        let a = transform.to_matrix().transform_point(p);
        let b = transform.transform_point(p);

        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }
}

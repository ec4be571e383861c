mod vector;
mod matrix;
mod transform;
mod rotation;
mod aabb;

pub use vector::Vector3;
pub use matrix::{Matrix3, Matrix4};
pub use transform::Transform;
pub use rotation::Quaternion;
pub use aabb::{Aabb, Axis};

/// Constant for a very small number, used for comparisons
pub const EPSILON: f32 = 1.0e-6;

/// Returns true if the two floating point values are approximately equal
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f32) -> bool {
    a.abs() < EPSILON
}

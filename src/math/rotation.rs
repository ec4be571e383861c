use crate::math::{Vector3, Matrix3};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Quaternion for representing orientations in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Quaternion {
    /// Real component
    pub w: f32,

    /// First imaginary component
    pub x: f32,

    /// Second imaginary component
    pub y: f32,

    /// Third imaginary component
    pub z: f32,
}

impl Quaternion {
    /// Creates a new quaternion
    #[inline]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Creates an identity quaternion (no rotation)
    #[inline]
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Creates a pure quaternion `(0, v)`
    #[inline]
    pub const fn pure(v: Vector3) -> Self {
        Self::new(0.0, v.x, v.y, v.z)
    }

    /// Creates a quaternion from an axis-angle representation
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let half_angle = angle * 0.5;
        let s = half_angle.sin();
        let c = half_angle.cos();
        let axis = axis.normalize();

        Self {
            w: c,
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
        }
    }

    /// Converts the quaternion to a rotation matrix
    pub fn to_rotation_matrix(&self) -> Matrix3 {
        let (w, x, y, z) = (self.w, self.x, self.y, self.z);

        let xx = x * x;
        let xy = x * y;
        let xz = x * z;
        let xw = x * w;

        let yy = y * y;
        let yz = y * z;
        let yw = y * w;

        let zz = z * z;
        let zw = z * w;

        Matrix3 {
            data: [
                [1.0 - 2.0 * (yy + zz), 2.0 * (xy - zw), 2.0 * (xz + yw)],
                [2.0 * (xy + zw), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - xw)],
                [2.0 * (xz - yw), 2.0 * (yz + xw), 1.0 - 2.0 * (xx + yy)],
            ],
        }
    }

    /// Returns the conjugate of this quaternion
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Returns the squared length of this quaternion
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the length of this quaternion
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a unit-length copy; degenerate quaternions collapse to identity
    #[inline]
    pub fn normalize(&self) -> Self {
        let mut q = *self;
        q.normalize_mut();
        q
    }

    /// Normalizes this quaternion in-place
    #[inline]
    pub fn normalize_mut(&mut self) {
        let len = self.length();
        if len > crate::math::EPSILON && len.is_finite() {
            self.w /= len;
            self.x /= len;
            self.y /= len;
            self.z /= len;
        } else {
            *self = Quaternion::identity();
        }
    }

    /// Rotates a vector by this quaternion (`q * v * q^-1`)
    pub fn rotate_vector(&self, v: Vector3) -> Vector3 {
        let result = *self * Quaternion::pure(v) * self.conjugate();
        Vector3::new(result.x, result.y, result.z)
    }

    /// Computes the dot product of two quaternions
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Convert to nalgebra Quaternion
    #[inline]
    pub fn to_nalgebra(&self) -> nalgebra::Quaternion<f32> {
        nalgebra::Quaternion::new(self.w, self.x, self.y, self.z)
    }

    /// Convert from nalgebra Quaternion
    #[inline]
    pub fn from_nalgebra(q: &nalgebra::Quaternion<f32>) -> Self {
        Self {
            w: q.scalar(),
            x: q.vector()[0],
            y: q.vector()[1],
            z: q.vector()[2],
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.w, self.x, self.y, self.z)
    }
}

// Hamilton product
impl Mul for Quaternion {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }
}

impl MulAssign for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Add for Quaternion {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.w + rhs.w, self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Quaternion {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

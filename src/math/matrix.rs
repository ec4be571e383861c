use nalgebra as na;
use crate::math::Vector3;
use std::fmt;
use std::ops::{Add, Sub, Mul, AddAssign};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A row-major 3x3 matrix used for inertia tensors and rotations
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Matrix3 {
    pub data: [[f32; 3]; 3],
}

/// A row-major 4x4 homogeneous matrix, handed to renderers as a model matrix
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Matrix4 {
    pub data: [[f32; 4]; 4],
}

// === Matrix3 Implementation ===

impl Matrix3 {
    /// Creates a new 3x3 matrix from a 2D array
    #[inline]
    pub fn new(data: [[f32; 3]; 3]) -> Self {
        Self { data }
    }

    /// Creates a new 3x3 identity matrix
    #[inline]
    pub fn identity() -> Self {
        Self::from_diagonal(Vector3::one())
    }

    /// Creates a new 3x3 zero matrix
    #[inline]
    pub fn zero() -> Self {
        Self { data: [[0.0; 3]; 3] }
    }

    /// Creates a diagonal matrix, e.g. a per-axis scale
    #[inline]
    pub fn from_diagonal(diagonal: Vector3) -> Self {
        Self {
            data: [
                [diagonal.x, 0.0, 0.0],
                [0.0, diagonal.y, 0.0],
                [0.0, 0.0, diagonal.z],
            ],
        }
    }

    /// Skew-symmetric matrix of `r`, so that `cross_matrix(r) * x == r.cross(x)`
    #[inline]
    pub fn cross_matrix(r: Vector3) -> Self {
        Self {
            data: [
                [0.0, -r.z, r.y],
                [r.z, 0.0, -r.x],
                [-r.y, r.x, 0.0],
            ],
        }
    }

    /// Outer product `a ⊗ b`
    #[inline]
    pub fn outer(a: Vector3, b: Vector3) -> Self {
        Self {
            data: [
                [a.x * b.x, a.x * b.y, a.x * b.z],
                [a.y * b.x, a.y * b.y, a.y * b.z],
                [a.z * b.x, a.z * b.y, a.z * b.z],
            ],
        }
    }

    /// Returns the determinant of the matrix
    pub fn determinant(&self) -> f32 {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.data;

        a * (e * i - f * h) -
        b * (d * i - f * g) +
        c * (d * h - e * g)
    }

    /// Returns the inverse of the matrix, or None if it is singular.
    ///
    /// Inertia tensors of small meshes have tiny determinants, so no absolute
    /// epsilon is applied; the inverse is only rejected when it is not finite.
    pub fn inverse(&self) -> Option<Self> {
        let inverse = self.to_nalgebra().try_inverse()?;
        let result = Self::from_nalgebra(&inverse);

        if result.is_finite() {
            Some(result)
        } else {
            None
        }
    }

    /// Returns the transpose of the matrix
    #[inline]
    pub fn transpose(&self) -> Self {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.data;

        Self {
            data: [
                [a, d, g],
                [b, e, h],
                [c, f, i],
            ],
        }
    }

    /// Multiplies the matrix by a vector
    #[inline]
    pub fn multiply_vector(&self, v: Vector3) -> Vector3 {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.data;

        Vector3::new(
            a * v.x + b * v.y + c * v.z,
            d * v.x + e * v.y + f * v.z,
            g * v.x + h * v.y + i * v.z,
        )
    }

    /// Multiplies the matrix by another matrix
    pub fn multiply_matrix(&self, other: &Self) -> Self {
        let mut result = Self::zero();

        for i in 0..3 {
            for j in 0..3 {
                let mut sum = 0.0;
                for k in 0..3 {
                    sum += self.data[i][k] * other.data[k][j];
                }
                result.data[i][j] = sum;
            }
        }

        result
    }

    /// Multiplies every entry by a scalar
    #[inline]
    pub fn scale(&self, factor: f32) -> Self {
        let mut result = *self;
        for row in result.data.iter_mut() {
            for value in row.iter_mut() {
                *value *= factor;
            }
        }
        result
    }

    /// Returns true if every entry is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|value| value.is_finite())
    }

    /// Returns true if the matrix equals its transpose within `tolerance`
    pub fn is_symmetric(&self, tolerance: f32) -> bool {
        (0..3).all(|i| (0..3).all(|j| (self.data[i][j] - self.data[j][i]).abs() <= tolerance))
    }

    /// Eigenvalues of the symmetric part of the matrix, ascending
    pub fn symmetric_eigenvalues(&self) -> [f32; 3] {
        let m = self.to_nalgebra();
        let symmetric = (m + m.transpose()) * 0.5;
        let eigen = symmetric.symmetric_eigenvalues();
        let mut values = [eigen[0], eigen[1], eigen[2]];
        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    /// Convert to nalgebra Matrix3
    #[inline]
    pub fn to_nalgebra(&self) -> na::Matrix3<f32> {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.data;

        na::Matrix3::new(
            a, b, c,
            d, e, f,
            g, h, i,
        )
    }

    /// Convert from nalgebra Matrix3
    #[inline]
    pub fn from_nalgebra(m: &na::Matrix3<f32>) -> Self {
        Self {
            data: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
        }
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Matrix3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let mut result = self;
        result += rhs;
        result
    }
}

impl AddAssign for Matrix3 {
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..3 {
            for j in 0..3 {
                self.data[i][j] += rhs.data[i][j];
            }
        }
    }
}

impl Sub for Matrix3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        let mut result = self;
        for i in 0..3 {
            for j in 0..3 {
                result.data[i][j] -= rhs.data[i][j];
            }
        }
        result
    }
}

impl Mul for Matrix3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply_matrix(&rhs)
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    #[inline]
    fn mul(self, rhs: Vector3) -> Self::Output {
        self.multiply_vector(rhs)
    }
}

impl fmt::Display for Matrix3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[ {}, {}, {} ]", self.data[0][0], self.data[0][1], self.data[0][2])?;
        writeln!(f, "[ {}, {}, {} ]", self.data[1][0], self.data[1][1], self.data[1][2])?;
        write!(f, "[ {}, {}, {} ]", self.data[2][0], self.data[2][1], self.data[2][2])
    }
}

// === Matrix4 Implementation ===

impl Matrix4 {
    /// Creates a new 4x4 identity matrix
    #[inline]
    pub fn identity() -> Self {
        Self::from_linear_translation(Matrix3::identity(), Vector3::zero())
    }

    /// Creates a 4x4 matrix from a 3x3 linear part and a translation
    #[inline]
    pub fn from_linear_translation(linear: Matrix3, translation: Vector3) -> Self {
        let l = linear.data;
        Self {
            data: [
                [l[0][0], l[0][1], l[0][2], translation.x],
                [l[1][0], l[1][1], l[1][2], translation.y],
                [l[2][0], l[2][1], l[2][2], translation.z],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Transforms a point (w = 1)
    #[inline]
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let m = &self.data;
        Vector3::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
        )
    }

    /// Extract the upper-left 3x3 matrix
    #[inline]
    pub fn to_matrix3(&self) -> Matrix3 {
        Matrix3 {
            data: [
                [self.data[0][0], self.data[0][1], self.data[0][2]],
                [self.data[1][0], self.data[1][1], self.data[1][2]],
                [self.data[2][0], self.data[2][1], self.data[2][2]],
            ],
        }
    }

    /// Extract the translation part of the matrix
    #[inline]
    pub fn get_translation(&self) -> Vector3 {
        Vector3::new(self.data[0][3], self.data[1][3], self.data[2][3])
    }

    /// Column-major array, the layout GPU uniform uploads expect
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = self.data[row][col];
            }
        }
        out
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, row) in self.data.iter().enumerate() {
            write!(f, "[ {}, {}, {}, {} ]", row[0], row[1], row[2], row[3])?;
            if i < 3 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cross_matrix_matches_cross_product() {
        let r = Vector3::new(0.3, -1.2, 2.0);
        let x = Vector3::new(-0.7, 0.4, 1.5);
        let via_matrix = Matrix3::cross_matrix(r) * x;
        let direct = r.cross(&x);

        assert_relative_eq!(via_matrix.x, direct.x, epsilon = 1e-6);
        assert_relative_eq!(via_matrix.y, direct.y, epsilon = 1e-6);
        assert_relative_eq!(via_matrix.z, direct.z, epsilon = 1e-6);
    }

    #[test]
    fn inverse_of_small_tensor_is_accepted() {
        // determinant 6.4e-8, well below EPSILON but perfectly invertible
        let m = Matrix3::from_diagonal(Vector3::splat(0.004));
        let inv = m.inverse().expect("small diagonal tensor must invert");
        assert_relative_eq!(inv.data[1][1], 250.0, epsilon = 1e-2);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Matrix3::zero().inverse().is_none());
        assert!(Matrix3::outer(Vector3::unit_x(), Vector3::unit_y()).inverse().is_none());
    }

    #[test]
    fn column_major_export_places_translation_last() {
        let m = Matrix4::from_linear_translation(Matrix3::identity(), Vector3::new(1.0, 2.0, 3.0));
        let cols = m.to_cols_array();
        assert_eq!(&cols[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(cols[15], 1.0);
    }
}

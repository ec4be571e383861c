use crate::error::PhysicsError;
use crate::math::Vector3;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A static half-space boundary: geometry must stay on the side `normal` points to
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BoundaryPlane {
    /// Any point on the plane
    point: Vector3,

    /// Outward unit normal
    normal: Vector3,
}

impl BoundaryPlane {
    /// Creates a boundary from a point on the plane and its outward normal (normalized here)
    pub fn new(point: Vector3, normal: Vector3) -> Result<Self> {
        if !point.is_finite() || !normal.is_finite() || normal.length() < crate::math::EPSILON {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "boundary plane needs a finite point and non-zero normal, got {} / {}",
                point, normal
            )));
        }

        Ok(Self {
            point,
            normal: normal.normalize(),
        })
    }

    /// The floor and four walls of the default demo room, in resolution order
    pub fn room() -> Vec<BoundaryPlane> {
        Self::room_with(-1.5, 15.0)
    }

    /// A floor at `floor_height` plus four walls at `±half_width` on x and z, in resolution order
    pub fn room_with(floor_height: f32, half_width: f32) -> Vec<BoundaryPlane> {
        vec![
            Self::axis_aligned(Vector3::new(0.0, floor_height, 0.0), Vector3::unit_y()),
            Self::axis_aligned(Vector3::new(half_width, 0.0, 0.0), -Vector3::unit_x()),
            Self::axis_aligned(Vector3::new(-half_width, 0.0, 0.0), Vector3::unit_x()),
            Self::axis_aligned(Vector3::new(0.0, 0.0, half_width), -Vector3::unit_z()),
            Self::axis_aligned(Vector3::new(0.0, 0.0, -half_width), Vector3::unit_z()),
        ]
    }

    // Unit normals only; skips validation.
    fn axis_aligned(point: Vector3, normal: Vector3) -> Self {
        Self { point, normal }
    }

    /// Returns a point on the plane
    pub fn point(&self) -> Vector3 {
        self.point
    }

    /// Returns the outward unit normal
    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    /// Signed distance from a point to the plane, negative behind it
    #[inline]
    pub fn signed_distance_to(&self, point: Vector3) -> f32 {
        (point - self.point).dot(&self.normal)
    }
}

use crate::error::PhysicsError;
use crate::math::Vector3;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Coordinate axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along this axis
    pub fn unit(self) -> Vector3 {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner of the AABB
    pub min: Vector3,

    /// Maximum corner of the AABB
    pub max: Vector3,
}

impl Aabb {
    /// Creates a new AABB from minimum and maximum points without validation
    #[inline]
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// Creates a new AABB, rejecting inverted or non-finite corners
    pub fn try_new(min: Vector3, max: Vector3) -> Result<Self> {
        let aabb = Self { min, max };
        if aabb.is_valid() {
            Ok(aabb)
        } else {
            Err(PhysicsError::DegenerateGeometry(format!(
                "bounding box min {} exceeds max {} or is not finite",
                min, max
            )))
        }
    }

    /// Creates the tightest AABB around a set of points
    pub fn from_points(points: &[Vector3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self::new(*first, *first);
        for point in rest {
            aabb.expand_to_include_point(*point);
        }
        Some(aabb)
    }

    /// True when both corners are finite and `min <= max` on every axis
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() &&
        self.min.x <= self.max.x &&
        self.min.y <= self.max.y &&
        self.min.z <= self.max.z
    }

    /// Returns the center of the AABB
    #[inline]
    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the extents of the AABB in each dimension
    #[inline]
    pub fn extents(&self) -> Vector3 {
        self.max - self.min
    }

    /// Returns the volume of the AABB
    #[inline]
    pub fn volume(&self) -> f32 {
        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// Checks if this AABB contains a point (boundaries inclusive)
    #[inline]
    pub fn contains_point(&self, point: Vector3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Checks if this AABB intersects with another AABB
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Returns the intersection of this AABB with another, if they intersect
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        Some(Self {
            min: self.min.max(&other.min),
            max: self.max.min(&other.max),
        })
    }

    /// Expands this AABB to include a point
    #[inline]
    pub fn expand_to_include_point(&mut self, point: Vector3) {
        self.min = self.min.min(&point);
        self.max = self.max.max(&point);
    }

    /// The eight corners, indexed by bit pattern (bit 0 = x, bit 1 = y, bit 2 = z; set = max)
    pub fn corners(&self) -> [Vector3; 8] {
        let mut corners = [Vector3::zero(); 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = Vector3::new(
                if i & 1 != 0 { self.max.x } else { self.min.x },
                if i & 2 != 0 { self.max.y } else { self.min.y },
                if i & 4 != 0 { self.max.z } else { self.min.z },
            );
        }
        corners
    }

    /// The twelve box edges as corner pairs
    pub fn edges(&self) -> [(Vector3, Vector3); 12] {
        const EDGES: [(usize, usize); 12] = [
            // bottom face (z = min)
            (0, 1), (1, 3), (3, 2), (2, 0),
            // top face (z = max)
            (4, 5), (5, 7), (7, 6), (6, 4),
            // verticals
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];

        let corners = self.corners();
        EDGES.map(|(a, b)| (corners[a], corners[b]))
    }

    /// Octant `index` of this box, using the same bit pattern as [`Aabb::corners`]
    pub fn octant(&self, index: usize) -> Self {
        let center = self.center();
        let pick = |bit: usize, lo: f32, mid: f32, hi: f32| {
            if index & bit != 0 { (mid, hi) } else { (lo, mid) }
        };

        let (min_x, max_x) = pick(1, self.min.x, center.x, self.max.x);
        let (min_y, max_y) = pick(2, self.min.y, center.y, self.max.y);
        let (min_z, max_z) = pick(4, self.min.z, center.z, self.max.z);

        Self::new(Vector3::new(min_x, min_y, min_z), Vector3::new(max_x, max_y, max_z))
    }

    /// Overlap depth along `axis`; negative when separated on that axis
    #[inline]
    pub fn overlap_along(&self, other: &Self, axis: Axis) -> f32 {
        self.max.get(axis).min(other.max.get(axis)) - self.min.get(axis).max(other.min.get(axis))
    }
}

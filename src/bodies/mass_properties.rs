use crate::math::{Matrix3, Vector3};

/// Smallest accepted ratio of the least to the greatest principal moment
pub const MIN_PRINCIPAL_MOMENT_RATIO: f32 = 1e-6;

/// Total mass and rest-frame inertia tensor of a point-mass vertex cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    /// Sum of the per-vertex point masses
    pub mass: f32,

    /// Inertia tensor about the object-space origin, in the rest frame
    pub inertia_reference: Matrix3,
}

impl MassProperties {
    /// Mass properties of a mesh whose every vertex carries `vertex_mass`.
    ///
    /// Vertices are scaled per axis before accumulation. The result is not
    /// normalized by vertex count, so denser meshes are heavier. An empty
    /// vertex list yields zero mass and a zero tensor.
    pub fn from_vertices(vertices: &[Vector3], scale: Vector3, vertex_mass: f32) -> Self {
        let mut mass = 0.0;
        let mut inertia_reference = Matrix3::zero();

        for vertex in vertices {
            let r = vertex.component_mul(&scale);
            mass += vertex_mass;
            // m (|r|² I - r ⊗ r)
            inertia_reference += (Matrix3::identity().scale(r.length_squared()) - Matrix3::outer(r, r))
                .scale(vertex_mass);
        }

        Self {
            mass,
            inertia_reference,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mass <= 0.0
    }

    /// Inverse of the rest-frame tensor, or `None` when it is singular.
    ///
    /// A tensor whose least principal moment is below
    /// [`MIN_PRINCIPAL_MOMENT_RATIO`] of its greatest counts as singular, so
    /// collinear clouds whose rounding leaves a tiny nonzero moment do not
    /// produce a huge finite inverse.
    pub fn inverse_inertia(&self) -> Option<Matrix3> {
        let [least, _, greatest] = self.inertia_reference.symmetric_eigenvalues();
        if !(greatest > 0.0) || least < greatest * MIN_PRINCIPAL_MOMENT_RATIO {
            return None;
        }
        self.inertia_reference.inverse()
    }
}

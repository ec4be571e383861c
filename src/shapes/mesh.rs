use crate::error::PhysicsError;
use crate::math::{Aabb, Vector3};
use crate::Result;

use std::f32::consts::PI;

/// Triangle mesh supplied by the asset layer.
///
/// The kernel only reads vertex positions; normals are carried along for the
/// renderer and can be regenerated from the triangle list.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Object-space vertex positions
    vertices: Vec<Vector3>,

    /// Optional per-vertex normals, same length as `vertices`
    normals: Option<Vec<Vector3>>,

    /// Triangle list, three indices per triangle
    indices: Vec<u32>,
}

impl Mesh {
    /// Creates a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh from vertices and a triangle index list.
    ///
    /// Fails if the index list is not a multiple of three or references a missing vertex.
    pub fn from_vertices_and_indices(vertices: Vec<Vector3>, indices: Vec<u32>) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(PhysicsError::DegenerateGeometry(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }

        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(PhysicsError::DegenerateGeometry(format!(
                "index {} out of range for {} vertices",
                bad,
                vertices.len()
            )));
        }

        Ok(Self {
            vertices,
            normals: None,
            indices,
        })
    }

    /// Creates a point-cloud mesh with no triangles
    pub fn from_vertices(vertices: Vec<Vector3>) -> Self {
        Self {
            vertices,
            normals: None,
            indices: Vec::new(),
        }
    }

    /// Attaches per-vertex normals
    pub fn with_normals(mut self, normals: Vec<Vector3>) -> Result<Self> {
        if normals.len() != self.vertices.len() {
            return Err(PhysicsError::DegenerateGeometry(format!(
                "{} normals supplied for {} vertices",
                normals.len(),
                self.vertices.len()
            )));
        }
        self.normals = Some(normals);
        Ok(self)
    }

    /// Axis-aligned box centred on the origin
    pub fn cuboid(half_extents: Vector3) -> Self {
        let aabb = Aabb::new(-half_extents, half_extents);
        let vertices = aabb.corners().to_vec();

        // Corner bit pattern: bit 0 = +x, bit 1 = +y, bit 2 = +z. Outward winding.
        let indices = vec![
            0, 4, 6, 0, 6, 2, // -x
            1, 3, 7, 1, 7, 5, // +x
            0, 1, 5, 0, 5, 4, // -y
            2, 6, 7, 2, 7, 3, // +y
            0, 2, 3, 0, 3, 1, // -z
            4, 5, 7, 4, 7, 6, // +z
        ];

        let mut mesh = Self { vertices, normals: None, indices };
        mesh.generate_normals();
        mesh
    }

    /// UV sphere without duplicated seam or pole vertices.
    ///
    /// `slices` is clamped to at least 3 and `stacks` to at least 2.
    pub fn uv_sphere(radius: f32, slices: u32, stacks: u32) -> Self {
        let slices = slices.max(3);
        let stacks = stacks.max(2);

        let mut vertices = Vec::with_capacity((2 + (stacks - 1) * slices) as usize);
        vertices.push(Vector3::new(0.0, radius, 0.0));

        for stack in 1..stacks {
            let phi = PI * stack as f32 / stacks as f32;
            let ring_radius = radius * phi.sin();
            let y = radius * phi.cos();
            for slice in 0..slices {
                let theta = 2.0 * PI * slice as f32 / slices as f32;
                vertices.push(Vector3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin()));
            }
        }

        let bottom = vertices.len() as u32;
        vertices.push(Vector3::new(0.0, -radius, 0.0));

        let ring = |stack: u32, slice: u32| 1 + (stack - 1) * slices + slice % slices;
        let mut indices = Vec::new();

        for slice in 0..slices {
            indices.extend_from_slice(&[0, ring(1, slice + 1), ring(1, slice)]);
        }

        for stack in 1..stacks - 1 {
            for slice in 0..slices {
                let upper = ring(stack, slice);
                let upper_next = ring(stack, slice + 1);
                let lower = ring(stack + 1, slice);
                let lower_next = ring(stack + 1, slice + 1);
                indices.extend_from_slice(&[upper, upper_next, lower_next]);
                indices.extend_from_slice(&[upper, lower_next, lower]);
            }
        }

        for slice in 0..slices {
            indices.extend_from_slice(&[bottom, ring(stacks - 1, slice), ring(stacks - 1, slice + 1)]);
        }

        let mut mesh = Self { vertices, normals: None, indices };
        mesh.generate_normals();
        mesh
    }

    /// Returns the vertices of the mesh
    pub fn get_vertices(&self) -> &[Vector3] {
        &self.vertices
    }

    /// Returns the triangle indices of the mesh
    pub fn get_indices(&self) -> &[u32] {
        &self.indices
    }

    /// Returns the per-vertex normals, if any
    pub fn get_normals(&self) -> Option<&[Vector3]> {
        self.normals.as_deref()
    }

    /// Returns the number of vertices in the mesh
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates the triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Object-space bounding box, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    /// Recomputes per-vertex normals as the area-weighted mean of adjacent face normals.
    ///
    /// Vertices not referenced by any triangle get a zero normal.
    pub fn generate_normals(&mut self) {
        let mut normals = vec![Vector3::zero(); self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let face = (self.vertices[b] - self.vertices[a]).cross(&(self.vertices[c] - self.vertices[a]));
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        for normal in normals.iter_mut() {
            *normal = normal.normalize();
        }

        self.normals = Some(normals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_indices() {
        let result = Mesh::from_vertices_and_indices(vec![Vector3::zero(); 2], vec![0, 1, 2]);
        assert!(result.is_err());

        let result = Mesh::from_vertices_and_indices(vec![Vector3::zero(); 3], vec![0, 1]);
        assert!(result.is_err());
    }

    #[test]
    fn cuboid_normals_point_outward() {
        let mesh = Mesh::cuboid(Vector3::new(1.0, 2.0, 0.5));
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);

        let normals = mesh.get_normals().expect("cuboid generates normals");
        for (vertex, normal) in mesh.get_vertices().iter().zip(normals) {
            assert!(vertex.dot(normal) > 0.0);
        }
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = Mesh::uv_sphere(0.5, 16, 8);
        assert_eq!(mesh.vertex_count(), 2 + 7 * 16);
        assert_eq!(mesh.triangle_count(), 2 * 16 * 7);

        for vertex in mesh.get_vertices() {
            assert!((vertex.length() - 0.5).abs() < 1e-5);
        }

        let normals = mesh.get_normals().expect("sphere generates normals");
        for (vertex, normal) in mesh.get_vertices().iter().zip(normals) {
            assert!(vertex.normalize().dot(normal) > 0.9);
        }
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
    }
}

use crate::bodies::body_flags::BodyFlags;
use crate::bodies::{MassProperties, Material};
use crate::collision::{resolve_plane, ContactResponse};
use crate::core::config::{ContactSettings, MIN_TIME_STEP};
use crate::core::SimulationConfig;
use crate::error::PhysicsError;
use crate::integration::{Integrator, QuaternionEulerIntegrator};
use crate::math::{Aabb, Matrix3, Matrix4, Quaternion, Transform, Vector3};
use crate::shapes::{BoundaryPlane, Mesh};
use crate::spatial::Octree;
use crate::Result;

use log::debug;
use std::sync::Arc;

/// A rigid solid built from a mesh's vertices
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// Position, orientation and per-axis scale
    transform: Transform,

    /// World-space linear velocity
    linear_velocity: Vector3,

    /// World-space angular velocity
    angular_velocity: Vector3,

    /// Read-only geometry shared with the renderer
    mesh: Arc<Mesh>,

    /// Friction, base restitution and damping
    material: Material,

    /// Current restitution; decays on low-energy impacts, reset by velocity injection
    restitution: f32,

    mass: f32,
    inv_mass: f32,

    /// Rest-frame inertia tensor, reused unrotated in contact solves
    inertia_reference: Matrix3,

    /// Inverse of the reference tensor, zero when the tensor is singular
    inv_inertia_reference: Matrix3,

    /// Gravitational acceleration magnitude
    gravity: f32,

    contact: ContactSettings,

    /// Velocity added by `add_default_velocity`
    injection_velocity: Vector3,

    flags: BodyFlags,

    /// Object-space bounds of the mesh
    local_bounds: Aabb,

    /// Debug subdivision of `local_bounds`
    octree: Octree,
}

impl RigidBody {
    /// Creates a body from a mesh, computing mass properties and the octree once.
    ///
    /// Fails on an empty mesh, a non-positive or non-finite scale, or an
    /// invalid configuration.
    pub fn from_mesh(mesh: Arc<Mesh>, transform: Transform, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let scale = transform.scale;
        if !scale.is_finite() || scale.x <= 0.0 || scale.y <= 0.0 || scale.z <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!("scale must be positive, got {}", scale)));
        }

        if !transform.position.is_finite() {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "position must be finite, got {}",
                transform.position
            )));
        }

        let local_bounds = mesh.bounds().ok_or_else(|| {
            PhysicsError::DegenerateGeometry("rigid body mesh has no vertices".into())
        })?;

        let props = MassProperties::from_vertices(mesh.get_vertices(), scale, config.vertex_mass);
        if !(props.mass.is_finite() && props.mass > 0.0) {
            return Err(PhysicsError::InvalidConfiguration(format!("body mass must be positive, got {}", props.mass)));
        }

        let inv_inertia_reference = props.inverse_inertia().unwrap_or_else(|| {
            debug!("inertia tensor of {}-vertex mesh is singular; body will not rotate from contacts", mesh.vertex_count());
            Matrix3::zero()
        });

        let octree = Octree::build(local_bounds, mesh.get_vertices(), config.octree)?;

        debug!(
            "rigid body created: {} vertices, mass {}, {} octree nodes",
            mesh.vertex_count(),
            props.mass,
            octree.node_count()
        );

        Ok(Self {
            transform: Transform {
                rotation: transform.rotation.normalize(),
                ..transform
            },
            linear_velocity: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            mesh,
            material: config.material,
            restitution: config.material.restitution,
            mass: props.mass,
            inv_mass: 1.0 / props.mass,
            inertia_reference: props.inertia_reference,
            inv_inertia_reference,
            gravity: config.gravity,
            contact: config.contact,
            injection_velocity: config.injection_velocity,
            flags: BodyFlags::default(),
            local_bounds,
            octree,
        })
    }

    /// Creates a body at `position` with unit scale and default configuration
    pub fn new_dynamic(mesh: Arc<Mesh>, position: Vector3) -> Result<Self> {
        Self::from_mesh(mesh, Transform::from_position(position), &SimulationConfig::default())
    }

    /// Returns the body's transform
    pub fn get_transform(&self) -> Transform {
        self.transform
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector3 {
        self.transform.position
    }

    /// Sets the body's position
    pub fn set_position(&mut self, position: Vector3) {
        self.transform.position = position;
    }

    /// Returns the body's orientation
    pub fn get_rotation(&self) -> Quaternion {
        self.transform.rotation
    }

    /// Sets the body's orientation (normalized on the way in)
    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.transform.rotation = rotation.normalize();
    }

    /// Returns the per-axis scale
    pub fn get_scale(&self) -> Vector3 {
        self.transform.scale
    }

    /// Model matrix for the renderer
    pub fn model_matrix(&self) -> Matrix4 {
        self.transform.to_matrix()
    }

    /// Returns the body's linear velocity
    pub fn get_linear_velocity(&self) -> Vector3 {
        self.linear_velocity
    }

    /// Sets the body's linear velocity without touching restitution
    pub fn set_linear_velocity(&mut self, velocity: Vector3) {
        self.linear_velocity = velocity;
    }

    /// Returns the body's angular velocity
    pub fn get_angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    /// Sets the body's angular velocity
    pub fn set_angular_velocity(&mut self, velocity: Vector3) {
        self.angular_velocity = velocity;
    }

    /// Injects external velocity and resets restitution to the material's base value
    pub fn add_velocity(&mut self, delta: Vector3) {
        self.restitution = self.material.restitution;
        self.linear_velocity += delta;
    }

    /// [`RigidBody::add_velocity`] with the configured injection velocity, `(0, 7, 0)` by default
    pub fn add_default_velocity(&mut self) {
        self.add_velocity(self.injection_velocity);
    }

    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    pub fn get_inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Rest-frame inertia tensor
    pub fn get_inertia_reference(&self) -> &Matrix3 {
        &self.inertia_reference
    }

    /// Inverse rest-frame inertia tensor (zero if the tensor is singular)
    pub fn get_inverse_inertia_reference(&self) -> &Matrix3 {
        &self.inv_inertia_reference
    }

    /// Current, possibly decayed, restitution
    pub fn get_restitution(&self) -> f32 {
        self.restitution
    }

    pub fn get_material(&self) -> &Material {
        &self.material
    }

    pub fn get_contact_settings(&self) -> &ContactSettings {
        &self.contact
    }

    pub fn get_mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn get_octree(&self) -> &Octree {
        &self.octree
    }

    /// Object-space line list of the octree's max-depth boxes
    pub fn octree_wireframe(&self) -> Vec<Vector3> {
        self.octree.wireframe_lines()
    }

    pub fn get_flags(&self) -> BodyFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: BodyFlags) {
        self.flags = flags;
    }

    pub fn has_flag(&self, flag: BodyFlags) -> bool {
        self.flags.contains(flag)
    }

    /// World-space offset of an object-space vertex from the body position.
    ///
    /// Scale is applied after rotation (`S * R * v`), matching the contact model
    /// the mass properties were tuned against.
    #[inline]
    pub fn contact_offset(&self, vertex: Vector3) -> Vector3 {
        self.transform.rotation.rotate_vector(vertex).component_mul(&self.transform.scale)
    }

    /// Velocity of the material point at `offset` from the body position
    #[inline]
    pub fn velocity_at(&self, offset: Vector3) -> Vector3 {
        self.linear_velocity + self.angular_velocity.cross(&offset)
    }

    /// Iterates the contact offsets of every mesh vertex
    pub fn contact_offsets(&self) -> impl Iterator<Item = Vector3> + '_ {
        self.mesh.get_vertices().iter().map(move |v| self.contact_offset(*v))
    }

    /// World-space bounds of the transformed vertices
    pub fn world_bounds(&self) -> Aabb {
        let position = self.transform.position;
        let mut points = self.contact_offsets().map(|offset| position + offset);
        let start = points.next().unwrap_or(position);
        points.fold(Aabb::new(start, start), |mut bounds, p| {
            bounds.expand_to_include_point(p);
            bounds
        })
    }

    /// Object-space bounds of the mesh
    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }

    /// Commits a contact response computed by the resolver
    pub fn apply_contact(&mut self, response: &ContactResponse) {
        self.linear_velocity += response.linear_velocity_change;
        self.angular_velocity += response.angular_velocity_change;
        self.restitution = response.restitution;
    }

    pub(crate) fn set_pose(&mut self, position: Vector3, rotation: Quaternion) {
        self.transform.position = position;
        self.transform.rotation = rotation.normalize();
    }

    /// Applies damping and gravity to the velocities (steps 1 to 4 of a frame)
    pub fn apply_gravity_and_damping(&mut self, dt: f32) {
        let gravity_force = if self.has_flag(BodyFlags::AFFECTED_BY_GRAVITY) {
            Vector3::new(0.0, -self.mass * self.gravity, 0.0)
        } else {
            Vector3::zero()
        };

        self.linear_velocity *= self.material.linear_decay;
        self.linear_velocity += gravity_force * (dt * self.inv_mass);
        self.angular_velocity *= self.material.angular_decay;
    }

    /// Resolves every boundary in order; later planes see earlier corrections
    pub fn resolve_boundaries(&mut self, boundaries: &[BoundaryPlane]) {
        for plane in boundaries {
            if let Some(response) = resolve_plane(self, plane) {
                self.apply_contact(&response);
            }
        }
    }

    /// Advances the body by `dt` seconds against the given boundaries.
    ///
    /// Non-finite steps and steps not exceeding [`MIN_TIME_STEP`] are ignored.
    pub fn advance(&mut self, dt: f64, boundaries: &[BoundaryPlane]) {
        self.advance_with(&mut QuaternionEulerIntegrator, dt, boundaries);
    }

    /// [`RigidBody::advance`] with a caller-chosen pose integrator
    pub fn advance_with(&mut self, integrator: &mut dyn Integrator, dt: f64, boundaries: &[BoundaryPlane]) {
        if !dt.is_finite() || dt <= MIN_TIME_STEP {
            return;
        }
        let dt = dt as f32;

        self.apply_gravity_and_damping(dt);
        self.resolve_boundaries(boundaries);
        integrator.integrate(self, dt);
    }
}

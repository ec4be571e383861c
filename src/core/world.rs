use crate::bodies::RigidBody;
use crate::collision::{resolve_body_pair, BruteForceBroadPhase};
use crate::core::config::MIN_TIME_STEP;
use crate::core::events::{BodyEventType, CollisionEvent};
use crate::core::storage::Storage;
use crate::core::{BodyEvent, BodyHandle, BodyStorage, EventQueue, SimulationConfig};
use crate::error::PhysicsError;
use crate::integration::{Integrator, QuaternionEulerIntegrator};
use crate::math::{Transform, Vector3};
use crate::shapes::{BoundaryPlane, Mesh};
use crate::Result;

use log::{debug, warn};
use std::sync::Arc;

/// Owns the bodies and boundary planes of a scene and steps them together
pub struct PhysicsWorld {
    /// All rigid bodies in the world, iterated in handle order
    bodies: BodyStorage<RigidBody>,

    /// Planes every body is resolved against, in order
    boundaries: Vec<BoundaryPlane>,

    /// Configuration for new bodies and for stepping
    config: SimulationConfig,

    /// Pose integrator shared by all bodies
    integrator: Box<dyn Integrator>,

    broad_phase: BruteForceBroadPhase,

    /// Events recorded during the last step
    events: EventQueue,

    /// The total elapsed simulation time
    time: f64,
}

impl PhysicsWorld {
    /// Creates a world with default settings inside the default room
    pub fn new() -> Self {
        Self {
            bodies: BodyStorage::new(),
            boundaries: BoundaryPlane::room(),
            config: SimulationConfig::default(),
            integrator: Box::new(QuaternionEulerIntegrator),
            broad_phase: BruteForceBroadPhase::new(),
            events: EventQueue::new(),
            time: 0.0,
        }
    }

    /// Creates a world with the given configuration and boundary planes
    pub fn with_config(config: SimulationConfig, boundaries: Vec<BoundaryPlane>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            boundaries,
            ..Self::new()
        })
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> f64 {
        self.time
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn boundaries(&self) -> &[BoundaryPlane] {
        &self.boundaries
    }

    /// Appends a plane; it is resolved after the existing ones
    pub fn add_boundary(&mut self, plane: BoundaryPlane) {
        self.boundaries.push(plane);
    }

    pub fn set_boundaries(&mut self, boundaries: Vec<BoundaryPlane>) {
        self.boundaries = boundaries;
    }

    /// Replaces the pose integrator
    pub fn set_integrator(&mut self, integrator: Box<dyn Integrator>) {
        debug!("switching integrator from {} to {}", self.integrator.name(), integrator.name());
        self.integrator = integrator;
    }

    pub fn integrator_name(&self) -> &str {
        self.integrator.name()
    }

    /// Builds a body from `mesh` with the world's configuration and adds it
    pub fn create_body(&mut self, mesh: Arc<Mesh>, transform: Transform) -> Result<BodyHandle> {
        let body = RigidBody::from_mesh(mesh, transform, &self.config)?;
        Ok(self.add_body(body))
    }

    /// Adds a rigid body to the world and returns its handle
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = self.bodies.add(body);
        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::Added,
            body: handle,
        });
        handle
    }

    /// Removes a rigid body from the world
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        self.bodies.get_body(handle)?;
        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::Removed,
            body: handle,
        });
        self.bodies.remove(handle).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle))
        })
    }

    /// Gets a reference to a rigid body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies.get_body(handle)
    }

    /// Gets a mutable reference to a rigid body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies.get_body_mut(handle)
    }

    /// Iterates bodies in handle order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> + '_ {
        self.bodies.iter()
    }

    /// Injects velocity into a body, resetting its restitution
    pub fn add_velocity(&mut self, handle: BodyHandle, delta: Vector3) -> Result<()> {
        self.bodies.get_body_mut(handle)?.add_velocity(delta);
        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::VelocityInjected,
            body: handle,
        });
        Ok(())
    }

    /// Injects the configured default velocity into every body
    pub fn add_default_velocity_to_all(&mut self) {
        for (handle, body) in self.bodies.iter_mut() {
            body.add_default_velocity();
            self.events.add_body_event(BodyEvent {
                event_type: BodyEventType::VelocityInjected,
                body: handle,
            });
        }
    }

    /// Advances every body by `dt`, then resolves overlapping body pairs.
    ///
    /// Bodies advance in handle order; pairs are resolved in `(lower, higher)`
    /// handle order. Non-finite, negative or too-small steps are ignored.
    pub fn step(&mut self, dt: f64) {
        if !dt.is_finite() || dt < 0.0 {
            warn!("ignoring invalid time step {}", dt);
            return;
        }
        if dt <= MIN_TIME_STEP {
            return;
        }

        self.events.clear();

        for (_, body) in self.bodies.iter_mut() {
            body.advance_with(self.integrator.as_mut(), dt, &self.boundaries);
        }

        if self.config.resolve_body_pairs {
            self.resolve_body_contacts();
        }

        self.time += dt;
    }

    fn resolve_body_contacts(&mut self) {
        self.broad_phase.update(self.bodies.iter());

        for pair in self.broad_phase.collision_pairs() {
            let response = match (self.bodies.get(pair.body_a), self.bodies.get(pair.body_b)) {
                (Some(a), Some(b)) => resolve_body_pair(a, b),
                _ => None,
            };
            let Some(response) = response else {
                continue;
            };

            if let Some(a) = self.bodies.get_mut(pair.body_a) {
                a.apply_contact(&response.body_a);
            }
            if let Some(b) = self.bodies.get_mut(pair.body_b) {
                b.apply_contact(&response.body_b);
            }

            self.events.add_collision_event(CollisionEvent {
                body_a: pair.body_a,
                body_b: pair.body_b,
                contact_point: response.body_a.contact_point,
                normal: response.normal,
                impulse: response.body_a.impulse.length(),
            });
        }
    }

    /// Returns a reference to the event queue
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn get_events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Removes all bodies and resets the clock; boundaries are kept
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.events.clear();
        self.time = 0.0;
    }

    /// Returns the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

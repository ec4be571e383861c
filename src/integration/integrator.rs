use crate::bodies::RigidBody;

/// Advances a body's pose from its current velocities
pub trait Integrator: Send + Sync {
    /// Integrates position and orientation over a time step
    fn integrate(&mut self, body: &mut RigidBody, dt: f32);

    /// Returns the name of the integrator
    fn name(&self) -> &str;
}

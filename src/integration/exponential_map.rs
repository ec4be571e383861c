use crate::bodies::RigidBody;
use crate::integration::Integrator;
use crate::math::Quaternion;

/// Explicit Euler on position; orientation is rotated by the exact axis-angle
/// increment `|w| dt` about `w`
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialMapIntegrator;

impl ExponentialMapIntegrator {
    pub fn new() -> Self {
        Self
    }
}

impl Integrator for ExponentialMapIntegrator {
    fn integrate(&mut self, body: &mut RigidBody, dt: f32) {
        let position = body.get_position() + body.get_linear_velocity() * dt;

        let angular_velocity = body.get_angular_velocity();
        let mut rotation = body.get_rotation();
        if !angular_velocity.is_zero() {
            let angle = angular_velocity.length() * dt;
            rotation = Quaternion::from_axis_angle(angular_velocity.normalize(), angle) * rotation;
        }

        body.set_pose(position, rotation);
    }

    fn name(&self) -> &str {
        "ExponentialMap"
    }
}

use crate::bodies::RigidBody;
use crate::integration::Integrator;
use crate::math::Quaternion;

/// Explicit Euler on position and on the quaternion derivative `q' = ½ (0, w) q`,
/// renormalized after every step
#[derive(Debug, Clone, Copy, Default)]
pub struct QuaternionEulerIntegrator;

impl QuaternionEulerIntegrator {
    pub fn new() -> Self {
        Self
    }
}

impl Integrator for QuaternionEulerIntegrator {
    fn integrate(&mut self, body: &mut RigidBody, dt: f32) {
        let position = body.get_position() + body.get_linear_velocity() * dt;

        let spin = Quaternion::pure(body.get_angular_velocity() * (0.5 * dt));
        let rotation = body.get_rotation();
        body.set_pose(position, rotation + spin * rotation);
    }

    fn name(&self) -> &str {
        "QuaternionEuler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use crate::shapes::Mesh;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    #[test]
    fn spin_keeps_unit_quaternion() {
        let mut body = RigidBody::new_dynamic(Arc::new(Mesh::cuboid(Vector3::one())), Vector3::zero()).unwrap();
        body.set_angular_velocity(Vector3::new(3.0, -7.0, 11.0));

        let mut integrator = QuaternionEulerIntegrator::new();
        for _ in 0..500 {
            integrator.integrate(&mut body, 0.05);
        }

        assert_relative_eq!(body.get_rotation().length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn spin_is_applied_in_world_frame() {
        let start = Quaternion::from_axis_angle(Vector3::unit_x(), 1.0);
        let mut body = RigidBody::new_dynamic(Arc::new(Mesh::cuboid(Vector3::one())), Vector3::zero()).unwrap();
        body.set_rotation(start);
        body.set_angular_velocity(Vector3::new(0.0, 2.0, 0.0));

        QuaternionEulerIntegrator.integrate(&mut body, 0.1);

        let spin = Quaternion::pure(Vector3::new(0.0, 0.1, 0.0));
        let world = (start + spin * start).normalize();
        let local = (start + start * spin).normalize();
        let rotation = body.get_rotation();

        assert_relative_eq!(rotation.w, world.w, epsilon = 1e-6);
        assert_relative_eq!(rotation.x, world.x, epsilon = 1e-6);
        assert_relative_eq!(rotation.y, world.y, epsilon = 1e-6);
        assert_relative_eq!(rotation.z, world.z, epsilon = 1e-6);
        // the two orders disagree on the sign of z
        assert!(world.z < -1e-2 && local.z > 1e-2);
    }

    #[test]
    fn position_moves_along_velocity() {
        let mut body = RigidBody::new_dynamic(Arc::new(Mesh::cuboid(Vector3::one())), Vector3::zero()).unwrap();
        body.set_linear_velocity(Vector3::new(1.0, 2.0, -4.0));

        QuaternionEulerIntegrator.integrate(&mut body, 0.5);

        assert_eq!(body.get_position(), Vector3::new(0.5, 1.0, -2.0));
        assert_eq!(body.get_rotation(), Quaternion::identity());
    }
}

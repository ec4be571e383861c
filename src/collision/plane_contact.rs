use crate::bodies::body_flags::BodyFlags;
use crate::bodies::RigidBody;
use crate::collision::contact::{ContactAccumulator, ContactResponse};
use crate::collision::impulse::{decayed_restitution, effective_mass, target_velocity};
use crate::shapes::BoundaryPlane;

use log::trace;

/// Computes the impulse response of `body` against one boundary plane.
///
/// Every mesh vertex that is behind the plane and moving into it contributes
/// to a single averaged contact. Returns `None` when no vertex qualifies, or
/// when the contact's effective mass cannot be inverted. The body itself is not
/// modified; commit the result with [`RigidBody::apply_contact`].
pub fn resolve_plane(body: &RigidBody, plane: &BoundaryPlane) -> Option<ContactResponse> {
    if !body.has_flag(BodyFlags::COLLIDES_WITH_BOUNDARIES) {
        return None;
    }

    let position = body.get_position();
    let normal = plane.normal();

    let mut contacts = ContactAccumulator::default();
    for offset in body.contact_offsets() {
        if plane.signed_distance_to(position + offset) >= 0.0 {
            continue;
        }
        let velocity = body.velocity_at(offset);
        if velocity.dot(&normal) < 0.0 {
            contacts.push(offset, velocity);
        }
    }

    let (offset, velocity) = contacts.average()?;

    let material = body.get_material();
    let settings = body.get_contact_settings();
    let restitution = body.get_restitution();

    let target = target_velocity(velocity, normal, restitution, material.friction, settings.tangential_epsilon);

    let inv_mass = body.get_inverse_mass();
    let inv_inertia = body.get_inverse_inertia_reference();
    let k = effective_mass(inv_mass, inv_inertia, offset);
    let Some(k_inv) = k.inverse() else {
        trace!("plane contact skipped: singular effective mass at offset {}", offset);
        return None;
    };

    let impulse = k_inv * (target.velocity - velocity);
    if !impulse.is_finite() {
        trace!("plane contact skipped: non-finite impulse {}", impulse);
        return None;
    }

    let restitution = if body.has_flag(BodyFlags::ADAPTIVE_RESTITUTION) {
        decayed_restitution(restitution, target.incoming_normal_speed, settings.low_energy_speed, settings.restitution_decay)
    } else {
        restitution
    };

    Some(ContactResponse {
        linear_velocity_change: impulse * inv_mass,
        angular_velocity_change: *inv_inertia * offset.cross(&impulse),
        restitution,
        impulse,
        contact_point: position + offset,
        contact_count: contacts.count(),
        incoming_normal_speed: target.incoming_normal_speed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Quaternion, Transform, Vector3};
    use crate::shapes::Mesh;
    use crate::SimulationConfig;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn cube_at(y: f32) -> RigidBody {
        RigidBody::new_dynamic(Arc::new(Mesh::cuboid(Vector3::splat(0.5))), Vector3::new(0.0, y, 0.0)).unwrap()
    }

    fn floor() -> BoundaryPlane {
        BoundaryPlane::new(Vector3::zero(), Vector3::unit_y()).unwrap()
    }

    #[test]
    fn separated_body_has_no_response() {
        let mut body = cube_at(2.0);
        body.set_linear_velocity(Vector3::new(0.0, -5.0, 0.0));
        assert!(resolve_plane(&body, &floor()).is_none());
    }

    #[test]
    fn receding_body_has_no_response() {
        let mut body = cube_at(0.3);
        body.set_linear_velocity(Vector3::new(0.0, 1.0, 0.0));
        assert!(resolve_plane(&body, &floor()).is_none());
    }

    #[test]
    fn flat_impact_bounces_with_restitution() {
        let mut body = cube_at(0.4);
        body.set_linear_velocity(Vector3::new(0.0, -4.0, 0.0));

        let response = resolve_plane(&body, &floor()).unwrap();
        assert_eq!(response.contact_count, 4);
        assert_relative_eq!(response.contact_point.y, -0.1, epsilon = 1e-6);

        body.apply_contact(&response);
        assert_relative_eq!(body.get_linear_velocity().y, 2.0, epsilon = 1e-4);
        assert_relative_eq!(body.get_angular_velocity().length(), 0.0, epsilon = 1e-4);
        // fast impact keeps restitution
        assert_eq!(body.get_restitution(), 0.5);
    }

    #[test]
    fn slow_impact_decays_restitution() {
        let mut body = cube_at(0.4);
        body.set_linear_velocity(Vector3::new(0.0, -0.5, 0.0));

        let response = resolve_plane(&body, &floor()).unwrap();
        assert_relative_eq!(response.restitution, 0.45);
    }

    #[test]
    fn fixed_restitution_without_adaptive_flag() {
        let mut body = cube_at(0.4);
        body.set_flags(BodyFlags::default() - BodyFlags::ADAPTIVE_RESTITUTION);
        body.set_linear_velocity(Vector3::new(0.0, -0.5, 0.0));

        let response = resolve_plane(&body, &floor()).unwrap();
        assert_eq!(response.restitution, 0.5);
    }

    #[test]
    fn corner_impact_induces_spin() {
        let tilt = Quaternion::from_axis_angle(Vector3::new(1.0, 0.0, 1.0).normalize(), 0.6);
        let transform = Transform::from_position(Vector3::new(0.0, 0.7, 0.0)).with_rotation(tilt);
        let mut body = RigidBody::from_mesh(
            Arc::new(Mesh::cuboid(Vector3::splat(0.5))),
            transform,
            &SimulationConfig::default(),
        )
        .unwrap();
        body.set_linear_velocity(Vector3::new(0.0, -3.0, 0.0));

        let response = resolve_plane(&body, &floor()).unwrap();
        assert!(response.angular_velocity_change.length() > 0.0);
        assert!(response.impulse.y > 0.0);
    }

    #[test]
    fn boundary_flag_disables_resolution() {
        let mut body = cube_at(0.4);
        body.set_flags(BodyFlags::default() - BodyFlags::COLLIDES_WITH_BOUNDARIES);
        body.set_linear_velocity(Vector3::new(0.0, -4.0, 0.0));
        assert!(resolve_plane(&body, &floor()).is_none());
    }
}

use crate::bodies::body_flags::BodyFlags;
use crate::bodies::RigidBody;
use crate::collision::contact::{ContactAccumulator, ContactResponse, PairResponse};
use crate::collision::impulse::{decayed_restitution, effective_mass, target_velocity};
use crate::math::{Axis, Vector3};

use log::trace;

/// Computes the impulse response between two bodies whose world bounds overlap.
///
/// The contact plane passes through the center of the bounds' intersection,
/// with its normal along the axis of least overlap, pointing from `b` towards
/// `a`. Vertices of `a` behind the plane and vertices of `b` in front of it that
/// are approaching each other are averaged into a single contact. Restitution
/// and friction are the means of the two bodies' values.
pub fn resolve_body_pair(a: &RigidBody, b: &RigidBody) -> Option<PairResponse> {
    if !(a.has_flag(BodyFlags::COLLIDES_WITH_BODIES) && b.has_flag(BodyFlags::COLLIDES_WITH_BODIES)) {
        return None;
    }

    let bounds_a = a.world_bounds();
    let bounds_b = b.world_bounds();
    let overlap = bounds_a.intersection(&bounds_b)?;

    let axis = Axis::ALL
        .into_iter()
        .min_by(|l, r| {
            bounds_a
                .overlap_along(&bounds_b, *l)
                .total_cmp(&bounds_a.overlap_along(&bounds_b, *r))
        })
        .unwrap_or(Axis::Y);
    let normal = if bounds_a.center().get(axis) >= bounds_b.center().get(axis) {
        axis.unit()
    } else {
        -axis.unit()
    };
    let plane_point = overlap.center();

    let position_a = a.get_position();
    let position_b = b.get_position();
    let relative_velocity = |point: Vector3| a.velocity_at(point - position_a) - b.velocity_at(point - position_b);

    let mut contacts = ContactAccumulator::default();
    for offset in a.contact_offsets() {
        let point = position_a + offset;
        if (point - plane_point).dot(&normal) < 0.0 {
            let velocity = relative_velocity(point);
            if velocity.dot(&normal) < 0.0 {
                contacts.push(point, velocity);
            }
        }
    }
    for offset in b.contact_offsets() {
        let point = position_b + offset;
        if (point - plane_point).dot(&normal) > 0.0 {
            let velocity = relative_velocity(point);
            if velocity.dot(&normal) < 0.0 {
                contacts.push(point, velocity);
            }
        }
    }

    let (point, velocity) = contacts.average()?;
    let offset_a = point - position_a;
    let offset_b = point - position_b;

    let restitution_a = a.get_restitution();
    let restitution_b = b.get_restitution();
    let restitution = 0.5 * (restitution_a + restitution_b);
    let friction = 0.5 * (a.get_material().friction + b.get_material().friction);
    let settings = a.get_contact_settings();

    let target = target_velocity(velocity, normal, restitution, friction, settings.tangential_epsilon);

    let k = effective_mass(a.get_inverse_mass(), a.get_inverse_inertia_reference(), offset_a)
        + effective_mass(b.get_inverse_mass(), b.get_inverse_inertia_reference(), offset_b);
    let Some(k_inv) = k.inverse() else {
        trace!("body contact skipped: singular effective mass");
        return None;
    };

    let impulse = k_inv * (target.velocity - velocity);
    if !impulse.is_finite() {
        trace!("body contact skipped: non-finite impulse {}", impulse);
        return None;
    }

    let respond = |body: &RigidBody, offset: Vector3, impulse: Vector3, restitution: f32| {
        let settings = body.get_contact_settings();
        let restitution = if body.has_flag(BodyFlags::ADAPTIVE_RESTITUTION) {
            decayed_restitution(restitution, target.incoming_normal_speed, settings.low_energy_speed, settings.restitution_decay)
        } else {
            restitution
        };

        ContactResponse {
            linear_velocity_change: impulse * body.get_inverse_mass(),
            angular_velocity_change: *body.get_inverse_inertia_reference() * offset.cross(&impulse),
            restitution,
            impulse,
            contact_point: point,
            contact_count: contacts.count(),
            incoming_normal_speed: target.incoming_normal_speed,
        }
    };

    Some(PairResponse {
        normal,
        body_a: respond(a, offset_a, impulse, restitution_a),
        body_b: respond(b, offset_b, -impulse, restitution_b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Mesh;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn cube_at(position: Vector3) -> RigidBody {
        RigidBody::new_dynamic(Arc::new(Mesh::cuboid(Vector3::splat(0.5))), position).unwrap()
    }

    #[test]
    fn separated_bodies_do_not_interact() {
        let a = cube_at(Vector3::new(0.0, 3.0, 0.0));
        let b = cube_at(Vector3::zero());
        assert!(resolve_body_pair(&a, &b).is_none());
    }

    #[test]
    fn stacked_impact_conserves_momentum() {
        let mut a = cube_at(Vector3::new(0.0, 0.9, 0.0));
        let mut b = cube_at(Vector3::zero());
        a.set_linear_velocity(Vector3::new(0.0, -2.0, 0.0));

        let response = resolve_body_pair(&a, &b).unwrap();
        assert_eq!(response.normal, Vector3::unit_y());
        assert_eq!(response.body_a.contact_count, 8);
        assert_eq!(response.body_a.impulse, -response.body_b.impulse);

        a.apply_contact(&response.body_a);
        b.apply_contact(&response.body_b);

        assert_relative_eq!(a.get_linear_velocity().y, -0.5, epsilon = 1e-4);
        assert_relative_eq!(b.get_linear_velocity().y, -1.5, epsilon = 1e-4);
        let momentum = (a.get_linear_velocity() * a.get_mass() + b.get_linear_velocity() * b.get_mass()).y;
        assert_relative_eq!(momentum, -2.0 * a.get_mass(), epsilon = 1e-6);
    }

    #[test]
    fn separating_bodies_are_left_alone() {
        let mut a = cube_at(Vector3::new(0.0, 0.9, 0.0));
        let b = cube_at(Vector3::zero());
        a.set_linear_velocity(Vector3::new(0.0, 1.0, 0.0));
        assert!(resolve_body_pair(&a, &b).is_none());
    }

    #[test]
    fn normal_points_from_b_to_a() {
        let mut a = cube_at(Vector3::new(-0.8, 0.0, 0.0));
        let b = cube_at(Vector3::zero());
        a.set_linear_velocity(Vector3::new(3.0, 0.0, 0.0));

        let response = resolve_body_pair(&a, &b).unwrap();
        assert_eq!(response.normal, -Vector3::unit_x());
        assert!(response.body_a.linear_velocity_change.x < 0.0);
        assert!(response.body_b.linear_velocity_change.x > 0.0);
    }

    #[test]
    fn body_flag_disables_pair() {
        let mut a = cube_at(Vector3::new(0.0, 0.9, 0.0));
        let b = cube_at(Vector3::zero());
        a.set_linear_velocity(Vector3::new(0.0, -2.0, 0.0));
        a.set_flags(BodyFlags::default() - BodyFlags::COLLIDES_WITH_BODIES);
        assert!(resolve_body_pair(&a, &b).is_none());
    }
}

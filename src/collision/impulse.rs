use crate::math::{Matrix3, Vector3};

/// Desired post-impact velocity of a contact point
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ImpulseTarget {
    pub velocity: Vector3,

    /// `|v · n|` before the response
    pub incoming_normal_speed: f32,
}

/// Reflects the normal part of `velocity` by `restitution` and scales the
/// tangential part down by Coulomb-style friction.
///
/// The tangential scale is `max(1 - mu (1 + e) |v_n| / |v_t|, 0)`, or zero when
/// the tangential speed is below `tangential_epsilon`.
pub(crate) fn target_velocity(
    velocity: Vector3,
    normal: Vector3,
    restitution: f32,
    friction: f32,
    tangential_epsilon: f32,
) -> ImpulseTarget {
    let normal_speed = velocity.dot(&normal);
    let v_n = normal * normal_speed;
    let v_t = velocity - v_n;

    let tangential_speed = v_t.length();
    let friction_scale = if tangential_speed < tangential_epsilon {
        0.0
    } else {
        (1.0 - friction * (1.0 + restitution) * v_n.length() / tangential_speed).max(0.0)
    };

    ImpulseTarget {
        velocity: v_n * -restitution + v_t * friction_scale,
        incoming_normal_speed: normal_speed.abs(),
    }
}

/// Velocity change at `offset` per unit impulse: `(1/m) I - [r]x I⁻¹ [r]x`
pub(crate) fn effective_mass(inv_mass: f32, inv_inertia: &Matrix3, offset: Vector3) -> Matrix3 {
    let r = Matrix3::cross_matrix(offset);
    Matrix3::identity().scale(inv_mass) - r * *inv_inertia * r
}

/// Restitution after an impact with the given incoming normal speed
pub(crate) fn decayed_restitution(restitution: f32, incoming_normal_speed: f32, low_energy_speed: f32, decay: f32) -> f32 {
    if incoming_normal_speed < low_energy_speed {
        restitution * decay
    } else {
        restitution
    }
}

use crate::math::Vector3;

/// Velocity and restitution changes produced by one contact solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactResponse {
    /// Added to the linear velocity
    pub linear_velocity_change: Vector3,

    /// Added to the angular velocity
    pub angular_velocity_change: Vector3,

    /// Restitution the body carries after the impact
    pub restitution: f32,

    /// Impulse applied to this body
    pub impulse: Vector3,

    /// World-space average of the qualifying contact vertices
    pub contact_point: Vector3,

    /// Number of vertices averaged into the contact
    pub contact_count: usize,

    /// `|v · n|` of the contact point before the response
    pub incoming_normal_speed: f32,
}

/// Responses for both bodies of a body-vs-body contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairResponse {
    /// Contact normal, pointing from the second body towards the first
    pub normal: Vector3,

    pub body_a: ContactResponse,
    pub body_b: ContactResponse,
}

/// Running average of contact points and their velocities
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ContactAccumulator {
    point_sum: Vector3,
    velocity_sum: Vector3,
    count: usize,
}

impl ContactAccumulator {
    pub fn push(&mut self, point: Vector3, velocity: Vector3) {
        self.point_sum += point;
        self.velocity_sum += velocity;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean point and mean velocity, or `None` if nothing was pushed
    pub fn average(&self) -> Option<(Vector3, Vector3)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f32;
        Some((self.point_sum / n, self.velocity_sum / n))
    }
}

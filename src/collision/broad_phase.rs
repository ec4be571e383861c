use crate::bodies::body_flags::BodyFlags;
use crate::bodies::RigidBody;
use crate::core::BodyHandle;
use crate::math::Aabb;

/// A pair of bodies whose world bounds overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// The body with the lower handle
    pub body_a: BodyHandle,

    /// The body with the higher handle
    pub body_b: BodyHandle,
}

impl CollisionPair {
    /// Creates a new collision pair, ordering the handles
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        if body_a <= body_b {
            Self { body_a, body_b }
        } else {
            Self { body_a: body_b, body_b: body_a }
        }
    }

    /// Checks if this collision pair contains the specified body
    pub fn contains(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }
}

/// All-pairs bounds test over the bodies taking part in body contacts
#[derive(Debug, Default)]
pub struct BruteForceBroadPhase {
    bodies: Vec<(BodyHandle, Aabb)>,
}

impl BruteForceBroadPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes world bounds for the current body states
    pub fn update<'a>(&mut self, bodies: impl IntoIterator<Item = (BodyHandle, &'a RigidBody)>) {
        self.bodies.clear();
        for (handle, body) in bodies {
            if body.has_flag(BodyFlags::COLLIDES_WITH_BODIES) {
                self.bodies.push((handle, body.world_bounds()));
            }
        }
        self.bodies.sort_by_key(|(handle, _)| *handle);
    }

    /// Overlapping pairs, ordered by `(body_a, body_b)`
    pub fn collision_pairs(&self) -> Vec<CollisionPair> {
        let mut pairs = Vec::new();

        for (i, (handle_a, aabb_a)) in self.bodies.iter().enumerate() {
            for (handle_b, aabb_b) in &self.bodies[i + 1..] {
                if aabb_a.intersects(aabb_b) {
                    pairs.push(CollisionPair::new(*handle_a, *handle_b));
                }
            }
        }

        pairs
    }
}

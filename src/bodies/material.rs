#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Surface and damping properties of a rigid body
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Material {
    /// Tangential (Coulomb-like) friction coefficient μt
    pub friction: f32,

    /// Restitution the body starts with and returns to on velocity injection
    pub restitution: f32,

    /// Multiplicative linear velocity damping applied once per step
    pub linear_decay: f32,

    /// Multiplicative angular velocity damping applied once per step
    pub angular_decay: f32,
}

impl Material {
    /// Creates a new material with the specified properties
    pub fn new(friction: f32, restitution: f32, linear_decay: f32, angular_decay: f32) -> Self {
        Self {
            friction,
            restitution,
            linear_decay,
            angular_decay,
        }
    }

    /// No friction, fully elastic, no damping
    pub fn frictionless_elastic() -> Self {
        Self::new(0.0, 1.0, 1.0, 1.0)
    }

    /// Validates ranges: friction >= 0, restitution in [0, 1], decays in (0, 1]
    pub fn is_valid(&self) -> bool {
        self.friction.is_finite() && self.friction >= 0.0 &&
        (0.0..=1.0).contains(&self.restitution) &&
        self.linear_decay > 0.0 && self.linear_decay <= 1.0 &&
        self.angular_decay > 0.0 && self.angular_decay <= 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.7,
            restitution: 0.5,
            linear_decay: 0.999,
            angular_decay: 0.98,
        }
    }
}

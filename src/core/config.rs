use crate::bodies::Material;
use crate::error::PhysicsError;
use crate::math::Vector3;
use crate::spatial::{OctreeConfig, MAX_OCTREE_DEPTH};
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Steps shorter than this are ignored by the integrator
pub const MIN_TIME_STEP: f64 = 1.0e-9;

/// Tuning of the single-contact impulse response
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ContactSettings {
    /// Factor applied to restitution after each low-energy impact
    pub restitution_decay: f32,

    /// Incoming normal speed below which an impact counts as low-energy
    pub low_energy_speed: f32,

    /// Tangential speeds below this produce zero friction scale
    pub tangential_epsilon: f32,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            restitution_decay: 0.9,
            low_energy_speed: 1.0,
            tangential_epsilon: 1.0e-5,
        }
    }
}

/// Configuration parameters for body creation and stepping
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Gravitational acceleration magnitude along -y
    pub gravity: f32,

    /// Point mass contributed by every mesh vertex
    pub vertex_mass: f32,

    /// Default surface and damping properties for new bodies
    pub material: Material,

    /// Impulse response tuning
    pub contact: ContactSettings,

    /// Octree built for each new body
    pub octree: OctreeConfig,

    /// Velocity added by [`crate::RigidBody::add_default_velocity`]
    pub injection_velocity: Vector3,

    /// Whether the world resolves body-vs-body contacts after advancing
    pub resolve_body_pairs: bool,
}

impl SimulationConfig {
    /// Checks every parameter for a usable value
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfiguration(format!("gravity {} is not finite", self.gravity)));
        }

        if !(self.vertex_mass.is_finite() && self.vertex_mass > 0.0) {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "vertex mass must be positive, got {}",
                self.vertex_mass
            )));
        }

        if !self.material.is_valid() {
            return Err(PhysicsError::InvalidConfiguration(format!("material out of range: {:?}", self.material)));
        }

        let contact = &self.contact;
        if !(contact.restitution_decay > 0.0 && contact.restitution_decay <= 1.0) ||
           !(contact.low_energy_speed >= 0.0) ||
           !(contact.tangential_epsilon >= 0.0) {
            return Err(PhysicsError::InvalidConfiguration(format!("contact settings out of range: {:?}", contact)));
        }

        if self.octree.max_depth == 0 || self.octree.max_depth > MAX_OCTREE_DEPTH {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "octree depth must be in 1..={}, got {}",
                MAX_OCTREE_DEPTH, self.octree.max_depth
            )));
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            vertex_mass: 0.001,
            material: Material::default(),
            contact: ContactSettings::default(),
            octree: OctreeConfig::default(),
            injection_velocity: Vector3::new(0.0, 7.0, 0.0),
            resolve_body_pairs: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn non_positive_vertex_mass_is_rejected() {
        let mut config = SimulationConfig::default();
        config.vertex_mass = 0.0;
        assert!(matches!(config.validate(), Err(PhysicsError::InvalidConfiguration(_))));
    }

    #[test]
    fn restitution_above_one_is_rejected() {
        let mut config = SimulationConfig::default();
        config.material.restitution = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn octree_depth_is_bounded() {
        let mut config = SimulationConfig::default();
        config.octree.max_depth = MAX_OCTREE_DEPTH + 1;
        assert!(matches!(config.validate(), Err(PhysicsError::InvalidConfiguration(_))));

        config.octree.max_depth = MAX_OCTREE_DEPTH;
        assert!(config.validate().is_ok());
        config.octree.max_depth = 0;
        assert!(config.validate().is_err());
    }
}

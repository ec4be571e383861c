//! Rigid body kernel: per-vertex mass properties, a damped gravity integrator,
//! single-contact impulse resolution against boundary planes and other bodies,
//! and an octree over mesh bounds for debug wireframes.

pub mod math;
pub mod core;
pub mod bodies;
pub mod shapes;
pub mod collision;
pub mod integration;
pub mod spatial;

/// Re-export common types for easier usage
pub use crate::core::{PhysicsWorld, SimulationConfig, BodyHandle};
pub use crate::bodies::{RigidBody, MassProperties, Material};
pub use crate::bodies::body_flags::BodyFlags;
pub use crate::collision::{resolve_plane, resolve_body_pair, ContactResponse, PairResponse};
pub use crate::shapes::{Mesh, BoundaryPlane};
pub use crate::spatial::{Octree, OctreeConfig, Pruning};
pub use crate::math::{Vector3, Quaternion, Transform};

/// Error types for the physics kernel
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        #[error("Invalid configuration: {0}")]
        InvalidConfiguration(String),

        #[error("Degenerate geometry: {0}")]
        DegenerateGeometry(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        #[error("Simulation stability error: {0}")]
        SimulationError(String),
    }
}

/// Result type for physics kernel operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Kernel version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

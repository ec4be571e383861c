mod rigid_body;
mod material;
mod mass_properties;

pub use self::rigid_body::RigidBody;
pub use self::material::Material;
pub use self::mass_properties::MassProperties;

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling the behavior of rigid bodies
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct BodyFlags: u32 {
            /// Body is pulled along -y by the configured gravity
            const AFFECTED_BY_GRAVITY = 0x01;

            /// Body is resolved against boundary planes while advancing
            const COLLIDES_WITH_BOUNDARIES = 0x02;

            /// Body takes part in body-vs-body contact resolution
            const COLLIDES_WITH_BODIES = 0x04;

            /// Restitution decays after low-energy impacts
            const ADAPTIVE_RESTITUTION = 0x08;
        }
    }

    impl Default for BodyFlags {
        fn default() -> Self {
            Self::all()
        }
    }
}

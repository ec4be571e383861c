pub mod mesh;
pub mod plane;

pub use self::mesh::Mesh;
pub use self::plane::BoundaryPlane;

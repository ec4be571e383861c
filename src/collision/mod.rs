mod broad_phase;
mod contact;
mod impulse;
mod pair_contact;
mod plane_contact;

pub use self::broad_phase::{BruteForceBroadPhase, CollisionPair};
pub use self::contact::{ContactResponse, PairResponse};
pub use self::pair_contact::resolve_body_pair;
pub use self::plane_contact::resolve_plane;

pub mod octree;

pub use self::octree::{NodeId, Octree, OctreeConfig, OctreeNode, Pruning, MAX_OCTREE_DEPTH};

use crate::error::PhysicsError;
use crate::math::{Aabb, Vector3};
use crate::Result;

use log::debug;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Deepest subdivision accepted; `Retain` at this depth allocates 8^5 leaves
pub const MAX_OCTREE_DEPTH: u32 = 6;

/// Index of a node inside its [`Octree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What to do with octants that contain no mesh vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Pruning {
    /// Subdivide every octant down to the maximum depth
    Retain,

    /// Skip octants with no vertex inside them (the root is always kept)
    #[default]
    DropEmpty,
}

/// Octree build parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct OctreeConfig {
    /// Depth of the leaves; the root is depth 1
    pub max_depth: u32,

    pub pruning: Pruning,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            pruning: Pruning::DropEmpty,
        }
    }
}

/// One box of the subdivision
#[derive(Debug, Clone, PartialEq)]
pub struct OctreeNode {
    /// Box covered by this node
    pub bounds: Aabb,

    /// 1 for the root, increasing by one per level
    pub depth: u32,

    /// Number of mesh vertices falling inside this node
    pub vertex_count: usize,

    children: [Option<NodeId>; 8],
}

impl OctreeNode {
    /// Child octants, indexed by the [`Aabb::octant`] bit pattern
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }

    pub fn child(&self, octant: usize) -> Option<NodeId> {
        self.children.get(octant).copied().flatten()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// Depth-limited 8-ary subdivision of a mesh's bounding box, stored as an arena
#[derive(Debug, Clone, Default)]
pub struct Octree {
    nodes: Vec<OctreeNode>,
    max_depth: u32,
}

impl Octree {
    /// A tree with no nodes, used for degenerate input
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the tree over the bounding box of `vertices`
    pub fn from_vertices(vertices: &[Vector3], config: OctreeConfig) -> Result<Self> {
        let bounds = Aabb::from_points(vertices).ok_or_else(|| {
            PhysicsError::DegenerateGeometry("cannot build an octree over an empty vertex list".into())
        })?;
        Self::build(bounds, vertices, config)
    }

    /// Subdivides `bounds` down to `config.max_depth`.
    ///
    /// Vertices outside `bounds` are ignored. Inverted or non-finite bounds are rejected.
    pub fn build(bounds: Aabb, vertices: &[Vector3], config: OctreeConfig) -> Result<Self> {
        let bounds = Aabb::try_new(bounds.min, bounds.max)?;

        if config.max_depth == 0 || config.max_depth > MAX_OCTREE_DEPTH {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "octree depth must be within 1..={}, got {}",
                MAX_OCTREE_DEPTH, config.max_depth
            )));
        }

        let mut tree = Self {
            nodes: Vec::new(),
            max_depth: config.max_depth,
        };

        let inside: Vec<Vector3> = vertices
            .iter()
            .copied()
            .filter(|v| bounds.contains_point(*v))
            .collect();

        tree.subdivide(bounds, 1, inside, config);

        debug!(
            "octree built: {} nodes, {} leaves at depth {}",
            tree.node_count(),
            tree.leaf_count(),
            tree.max_depth
        );

        Ok(tree)
    }

    fn subdivide(&mut self, bounds: Aabb, depth: u32, vertices: Vec<Vector3>, config: OctreeConfig) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(OctreeNode {
            bounds,
            depth,
            vertex_count: vertices.len(),
            children: [None; 8],
        });

        if depth >= config.max_depth {
            return id;
        }

        let center = bounds.center();
        let mut buckets: [Vec<Vector3>; 8] = Default::default();
        for v in vertices {
            let octant = (v.x >= center.x) as usize
                | ((v.y >= center.y) as usize) << 1
                | ((v.z >= center.z) as usize) << 2;
            buckets[octant].push(v);
        }

        for (octant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() && config.pruning == Pruning::DropEmpty {
                continue;
            }
            let child = self.subdivide(bounds.octant(octant), depth + 1, bucket, config);
            self.nodes[id.index()].children[octant] = Some(child);
        }

        id
    }

    /// The root node, absent for an empty tree
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&OctreeNode> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> &[OctreeNode] {
        &self.nodes
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of nodes at every depth
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes sitting exactly at the maximum depth
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.depth == self.max_depth).count()
    }

    /// Line list (consecutive point pairs) with the 12 edges of every max-depth box
    pub fn wireframe_lines(&self) -> Vec<Vector3> {
        let mut lines = Vec::with_capacity(self.leaf_count() * 24);
        if let Some(root) = self.root() {
            self.append_wireframe(root, &mut lines);
        }
        lines
    }

    fn append_wireframe(&self, id: NodeId, lines: &mut Vec<Vector3>) {
        let node = &self.nodes[id.index()];
        if node.depth == self.max_depth {
            for (a, b) in node.bounds.edges() {
                lines.push(a);
                lines.push(b);
            }
        }
        for child in node.children() {
            self.append_wireframe(child, lines);
        }
    }

    /// Deepest node whose box contains `point`
    pub fn leaf_containing(&self, point: Vector3) -> Option<NodeId> {
        let mut current = self.root()?;
        if !self.nodes[current.index()].bounds.contains_point(point) {
            return None;
        }

        loop {
            let node = &self.nodes[current.index()];
            let center = node.bounds.center();
            let octant = (point.x >= center.x) as usize
                | ((point.y >= center.y) as usize) << 1
                | ((point.z >= center.z) as usize) << 2;
            match node.child(octant) {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }

    /// Max-depth nodes whose boxes intersect `region`
    pub fn query_aabb(&self, region: &Aabb) -> Vec<NodeId> {
        let mut hits = Vec::new();
        let mut stack: Vec<NodeId> = self.root().into_iter().collect();

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if !node.bounds.intersects(region) {
                continue;
            }
            if node.depth == self.max_depth {
                hits.push(id);
            }
            stack.extend(node.children());
        }

        hits.sort();
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Aabb {
        Aabb::new(Vector3::zero(), Vector3::one())
    }

    fn retain(max_depth: u32) -> OctreeConfig {
        OctreeConfig { max_depth, pruning: Pruning::Retain }
    }

    #[test]
    fn retained_tree_has_full_levels() {
        let tree = Octree::build(unit_cube(), &[], retain(2)).unwrap();
        assert_eq!(tree.leaf_count(), 8);
        assert_eq!(tree.node_count(), 9);

        let tree = Octree::build(unit_cube(), &[], retain(3)).unwrap();
        assert_eq!(tree.leaf_count(), 64);
        assert_eq!(tree.node_count(), 1 + 8 + 64);
    }

    #[test]
    fn depth_one_is_just_the_root() {
        let tree = Octree::build(unit_cube(), &[], retain(1)).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.wireframe_lines().len(), 24);
    }

    #[test]
    fn pruned_tree_keeps_only_occupied_octants() {
        let vertices = [Vector3::new(0.1, 0.1, 0.1), Vector3::new(0.9, 0.9, 0.9)];
        let config = OctreeConfig { max_depth: 3, pruning: Pruning::DropEmpty };
        let tree = Octree::build(unit_cube(), &vertices, config).unwrap();

        // root + 2 occupied octants + 1 occupied sub-octant each
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.leaf_count(), 2);

        let leaf = tree.leaf_containing(Vector3::new(0.9, 0.9, 0.9)).unwrap();
        let node = tree.node(leaf).unwrap();
        assert_eq!(node.depth, 3);
        assert_eq!(node.vertex_count, 1);
        assert_eq!(node.bounds.min, Vector3::splat(0.75));
    }

    #[test]
    fn pruned_tree_without_vertices_is_only_root() {
        let tree = Octree::build(unit_cube(), &[], OctreeConfig::default()).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaf_count(), 0);
        assert!(tree.wireframe_lines().is_empty());
    }

    #[test]
    fn malformed_bounds_are_rejected() {
        let inverted = Aabb::new(Vector3::one(), Vector3::zero());
        assert!(Octree::build(inverted, &[], OctreeConfig::default()).is_err());
        assert!(Octree::build(unit_cube(), &[], retain(0)).is_err());
        assert!(Octree::build(unit_cube(), &[], retain(MAX_OCTREE_DEPTH + 1)).is_err());
    }

    #[test]
    fn box_query_returns_touching_leaves() {
        let tree = Octree::build(unit_cube(), &[], retain(2)).unwrap();
        let region = Aabb::new(Vector3::splat(0.6), Vector3::splat(0.9));
        let hits = tree.query_aabb(&region);
        assert_eq!(hits.len(), 1);
        assert_eq!(tree.node(hits[0]).unwrap().bounds.max, Vector3::one());
    }

    #[test]
    fn point_outside_tree_has_no_leaf() {
        let tree = Octree::build(unit_cube(), &[], retain(2)).unwrap();
        assert!(tree.leaf_containing(Vector3::splat(2.0)).is_none());
        assert!(Octree::empty().leaf_containing(Vector3::zero()).is_none());
    }
}

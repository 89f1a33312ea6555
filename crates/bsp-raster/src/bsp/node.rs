//! BSP tree node implementation.

use std::fmt;

use crate::{Plane, Triangle};

/// Index of a node inside its [`BspTree`](super::BspTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("BSP tree exceeds u32 node range"))
    }

    /// Position of the node in [`BspTree::nodes`](super::BspTree::nodes).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the BSP tree.
///
/// Each node partitions space using a splitting plane derived from its first
/// (representative) triangle and stores every triangle found to lie on that
/// plane. Triangles in front of or behind the plane live in the respective
/// child subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct BspNode {
    /// The splitting plane for this node.
    plane: Plane,

    /// Triangles on the plane. The first one is the representative.
    triangles: Vec<Triangle>,

    /// Subtree containing triangles in FRONT of the splitting plane.
    front: Option<NodeId>,

    /// Subtree containing triangles BEHIND the splitting plane.
    back: Option<NodeId>,
}

impl BspNode {
    /// Creates a leaf node holding its representative triangle.
    pub fn new(plane: Plane, representative: Triangle) -> Self {
        Self {
            plane,
            triangles: vec![representative],
            front: None,
            back: None,
        }
    }

    /// Returns a reference to the splitting plane.
    #[inline]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Returns the triangles lying on this node's plane.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Returns the triangle the splitting plane was derived from.
    #[inline]
    pub fn representative(&self) -> &Triangle {
        &self.triangles[0]
    }

    /// Returns the number of triangles at this node.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns the front child, if any.
    #[inline]
    pub fn front(&self) -> Option<NodeId> {
        self.front
    }

    /// Returns the back child, if any.
    #[inline]
    pub fn back(&self) -> Option<NodeId> {
        self.back
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    #[inline]
    pub(crate) fn set_front(&mut self, node: Option<NodeId>) {
        self.front = node;
    }

    #[inline]
    pub(crate) fn set_back(&mut self, node: Option<NodeId>) {
        self.back = node;
    }

    #[inline]
    pub(crate) fn extend_triangles(&mut self, triangles: impl IntoIterator<Item = Triangle>) {
        self.triangles.extend(triangles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use nalgebra::Vector3;

    fn make_node() -> BspNode {
        let plane = Plane::new(Vector3::new(0.0, 1.0, 0.0), 0.0);
        BspNode::new(plane, Triangle::new(0, 1, 2, Color::WHITE))
    }

    #[test]
    fn new_node_is_leaf_with_representative() {
        let node = make_node();

        assert!(node.is_leaf());
        assert_eq!(node.triangle_count(), 1);
        assert_eq!(node.representative().indices(), [0, 1, 2]);
    }

    #[test]
    fn set_children_updates_leaf_status() {
        let mut node = make_node();

        node.set_front(Some(NodeId::new(1)));
        assert!(!node.is_leaf());
        assert_eq!(node.front(), Some(NodeId::new(1)));

        node.set_front(None);
        assert!(node.is_leaf());

        node.set_back(Some(NodeId::new(2)));
        assert!(!node.is_leaf());
    }

    #[test]
    fn coplanar_triangles_follow_representative() {
        let mut node = make_node();
        node.extend_triangles([Triangle::new(3, 4, 5, Color::BLACK)]);

        assert_eq!(node.triangle_count(), 2);
        assert_eq!(node.representative().indices(), [0, 1, 2]);
        assert_eq!(node.triangles()[1].indices(), [3, 4, 5]);
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId::new(7).to_string(), "#7");
        assert_eq!(NodeId::new(7).index(), 7);
    }
}

//! BSP tree container, construction and traversal.

use std::collections::VecDeque;
use std::fmt;

use log::debug;
use nalgebra::Point3;

use crate::split::{partition_triangle, Partition};
use crate::{PlaneSide, PointPool, Triangle, ON_PLANE_EPSILON};

use super::node::{BspNode, NodeId};
use super::selector::{LeastSplits, PlaneSelector};
use super::visitor::BspVisitor;

/// Settings for [`BspTree::build`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    /// Tolerance below which a vertex counts as lying on a splitting plane.
    pub epsilon: f32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            epsilon: ON_PLANE_EPSILON,
        }
    }
}

impl BuildOptions {
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// Settings for viewpoint traversals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraversalOptions {
    /// Skip a node's own triangles when its plane faces away from the eye.
    pub cull_back_faces: bool,
    /// Tolerance used to classify the eye against node planes.
    pub epsilon: f32,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            cull_back_faces: true,
            epsilon: ON_PLANE_EPSILON,
        }
    }
}

impl TraversalOptions {
    pub fn with_culling(mut self, cull_back_faces: bool) -> Self {
        self.cull_back_faces = cull_back_faces;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// Visit order of a viewpoint traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Farthest triangles first (painter's algorithm).
    BackToFront,
    /// Nearest triangles first.
    FrontToBack,
}

/// A Binary Space Partitioning tree over triangles of a shared [`PointPool`].
///
/// Each node holds the triangles lying on its splitting plane; triangles in
/// front of or behind the plane are stored in the front or back subtree.
/// Nodes live in an arena and refer to their children by [`NodeId`].
///
/// # Construction
///
/// Trees are built from a triangle list using a [`PlaneSelector`] to choose
/// splitting planes. Triangles spanning a plane are cut and the new points
/// appended to the pool:
///
/// ```ignore
/// use bsp_raster::{BspTree, BuildOptions, LeastSplits};
///
/// let tree = BspTree::build(&mut points, triangles, &LeastSplits, &BuildOptions::default());
/// ```
///
/// # Traversal
///
/// The tree supports back-to-front and front-to-back traversal relative to
/// a viewpoint, useful for painter's algorithm rendering:
///
/// ```ignore
/// tree.traverse_back_to_front(eye_position, &mut visitor);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BspTree {
    nodes: Vec<BspNode>,
    root: Option<NodeId>,
}

/// A node waiting for its remaining triangles to be partitioned.
struct WorkItem {
    node: NodeId,
    triangles: Vec<Triangle>,
}

impl BspTree {
    /// Creates an empty BSP tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a BSP tree from a list of triangles.
    ///
    /// Nodes are created breadth first from a FIFO work queue, so deep trees
    /// never recurse. Triangles spanning a splitting plane are cut and their
    /// new points appended to `points`; existing points are left untouched.
    ///
    /// Degenerate input triangles have no plane to split by and are
    /// dropped. Returns an empty tree if nothing is left.
    pub fn build<S: PlaneSelector>(
        points: &mut PointPool,
        mut triangles: Vec<Triangle>,
        selector: &S,
        options: &BuildOptions,
    ) -> Self {
        let input_triangles = triangles.len();
        let input_points = points.len();
        triangles.retain(|t| !t.is_degenerate(points));
        if triangles.len() < input_triangles {
            debug!(
                "dropped {} degenerate triangles before building",
                input_triangles - triangles.len()
            );
        }

        let mut tree = Self::new();
        let mut queue = VecDeque::new();
        tree.root = tree.plant(points, triangles, selector, options.epsilon, &mut queue);

        let mut splits = 0usize;
        while let Some(WorkItem { node, triangles }) = queue.pop_front() {
            let plane = *tree.nodes[node.index()].plane();

            let mut partition = Partition::new();
            for triangle in triangles {
                let placement =
                    partition_triangle(points, &plane, triangle, options.epsilon, &mut partition);
                if placement.is_split() {
                    splits += 1;
                }
            }

            let Partition {
                front,
                back,
                coplanar,
            } = partition;
            tree.nodes[node.index()].extend_triangles(coplanar);

            let front = tree.plant(points, front, selector, options.epsilon, &mut queue);
            let back = tree.plant(points, back, selector, options.epsilon, &mut queue);
            let node = &mut tree.nodes[node.index()];
            node.set_front(front);
            node.set_back(back);
        }

        debug!(
            "built BSP tree: {input_triangles} triangles in, {} out, {} nodes, depth {}, {splits} splits, {} new points",
            tree.triangle_count(),
            tree.node_count(),
            tree.depth(),
            points.len() - input_points,
        );
        tree
    }

    /// Builds a BSP tree using [`LeastSplits`] and default options.
    pub fn from_triangles(points: &mut PointPool, triangles: Vec<Triangle>) -> Self {
        Self::build(points, triangles, &LeastSplits, &BuildOptions::default())
    }

    /// Creates a node for the selector's choice out of `triangles` and queues
    /// the rest of them for partitioning.
    fn plant<S: PlaneSelector>(
        &mut self,
        points: &PointPool,
        mut triangles: Vec<Triangle>,
        selector: &S,
        epsilon: f32,
        queue: &mut VecDeque<WorkItem>,
    ) -> Option<NodeId> {
        if triangles.is_empty() {
            return None;
        }

        let index = selector
            .select(points, &triangles, epsilon)
            .filter(|&i| i < triangles.len())
            .unwrap_or(0);
        let representative = triangles.swap_remove(index);

        let id = NodeId::new(self.nodes.len());
        self.nodes
            .push(BspNode::new(representative.plane(points), representative));
        if !triangles.is_empty() {
            queue.push_back(WorkItem {
                node: id,
                triangles,
            });
        }
        Some(id)
    }

    /// Returns `true` if the tree contains no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the id of the root node, if any.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &BspNode {
        &self.nodes[id.index()]
    }

    /// Returns every node in creation order; the root comes first.
    #[inline]
    pub fn nodes(&self) -> &[BspNode] {
        &self.nodes
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the total number of triangles in the tree.
    pub fn triangle_count(&self) -> usize {
        self.nodes.iter().map(BspNode::triangle_count).sum()
    }

    /// Returns the maximum depth of the tree (0 for empty tree).
    pub fn depth(&self) -> usize {
        self.depth_first()
            .map(|(depth, _, _)| depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Walks the tree depth first, front subtree before back subtree.
    ///
    /// Yields `(depth, id, node)` with the root at depth 0.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: self.root.map(|root| (0, root)).into_iter().collect(),
        }
    }

    /// Collects all triangles in the tree into a vector, in depth-first
    /// node order.
    pub fn collect_triangles(&self) -> Vec<Triangle> {
        let mut result = Vec::with_capacity(self.triangle_count());
        for (_, _, node) in self.depth_first() {
            result.extend_from_slice(node.triangles());
        }
        result
    }

    /// Traverses the tree back-to-front relative to the given viewpoint,
    /// culling nodes whose plane faces away from it.
    ///
    /// This ordering is what the painter's algorithm needs: nearer triangles
    /// are visited last and drawn on top.
    pub fn traverse_back_to_front<V: BspVisitor>(&self, eye: Point3<f32>, visitor: &mut V) {
        self.traverse(
            eye,
            TraversalOrder::BackToFront,
            &TraversalOptions::default(),
            visitor,
        );
    }

    /// Traverses the tree front-to-back relative to the given viewpoint.
    ///
    /// This is the reverse of back-to-front traversal, useful when you need
    /// near triangles first (e.g. occlusion queries).
    pub fn traverse_front_to_back<V: BspVisitor>(&self, eye: Point3<f32>, visitor: &mut V) {
        self.traverse(
            eye,
            TraversalOrder::FrontToBack,
            &TraversalOptions::default(),
            visitor,
        );
    }

    /// Traverses the whole tree in `order` with explicit options.
    pub fn traverse<V: BspVisitor>(
        &self,
        eye: Point3<f32>,
        order: TraversalOrder,
        options: &TraversalOptions,
        visitor: &mut V,
    ) {
        if let Some(root) = self.root {
            self.traverse_subtree(root, eye, order, options, visitor);
        }
    }

    /// Traverses the subtree rooted at `start`.
    ///
    /// For every node the eye is classified against the node's plane:
    ///
    /// - **Front**: far (back) subtree, own triangles, near (front) subtree
    /// - **Back**: far (front) subtree, own triangles, near (back) subtree
    /// - **On**: back subtree then front subtree, own triangles are skipped
    ///
    /// With culling enabled, own triangles are only visited when the plane
    /// faces the eye. [`TraversalOrder::FrontToBack`] reverses every step.
    pub fn traverse_subtree<V: BspVisitor>(
        &self,
        start: NodeId,
        eye: Point3<f32>,
        order: TraversalOrder,
        options: &TraversalOptions,
        visitor: &mut V,
    ) {
        enum Step {
            Enter(NodeId),
            Emit(NodeId),
        }

        let mut stack = vec![Step::Enter(start)];
        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Emit(id) => {
                    visitor.visit(self.node(id).triangles());
                    continue;
                }
                Step::Enter(id) => id,
            };

            let node = self.node(id);
            let plane = node.plane();
            let (far, near, own) = match plane.classify_point_with_epsilon(eye, options.epsilon) {
                PlaneSide::Front => (node.back(), node.front(), true),
                PlaneSide::Back => (node.front(), node.back(), true),
                PlaneSide::On => (node.back(), node.front(), false),
            };
            let own = own && (!options.cull_back_faces || plane.faces(eye));

            let (first, last) = match order {
                TraversalOrder::BackToFront => (far, near),
                TraversalOrder::FrontToBack => (near, far),
            };
            // Pushed in reverse.
            if let Some(last) = last {
                stack.push(Step::Enter(last));
            }
            if own {
                stack.push(Step::Emit(id));
            }
            if let Some(first) = first {
                stack.push(Step::Enter(first));
            }
        }
    }
}

/// Depth-first iterator over the nodes of a [`BspTree`].
///
/// Created by [`BspTree::depth_first`].
pub struct DepthFirst<'a> {
    tree: &'a BspTree,
    stack: Vec<(usize, NodeId)>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (usize, NodeId, &'a BspNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.stack.pop()?;
        let node = self.tree.node(id);
        if let Some(back) = node.back() {
            self.stack.push((depth + 1, back));
        }
        if let Some(front) = node.front() {
            self.stack.push((depth + 1, front));
        }
        Some((depth, id, node))
    }
}

impl fmt::Display for BspTree {
    /// Dumps every node with its plane coefficients and triangle indices.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "(empty)");
        }
        for (depth, id, node) in self.depth_first() {
            let c = node.plane().coefficients();
            write!(
                f,
                "{:indent$}{id} plane ({}, {}, {}, {}):",
                "",
                c.x,
                c.y,
                c.z,
                c.w,
                indent = depth * 2
            )?;
            for triangle in node.triangles() {
                let [a, b, c] = triangle.indices();
                write!(f, " [{a} {b} {c}]")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

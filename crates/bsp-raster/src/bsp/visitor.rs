//! Callbacks invoked by tree traversal.
//!
//! A traversal hands each visited node's triangle group to a [`BspVisitor`].
//! Closures taking `&[Triangle]` are visitors too, which covers one-off
//! counting or filtering without a named type.

use crate::Triangle;

/// Receives the triangle groups of visited nodes, in traversal order.
///
/// The renderer projects and fills each group; [`CollectingVisitor`] keeps
/// them for inspection.
pub trait BspVisitor {
    /// Called once per drawn node with all of its triangles.
    ///
    /// Every triangle in `triangles` lies on the node's splitting plane.
    fn visit(&mut self, triangles: &[Triangle]);
}

impl<F> BspVisitor for F
where
    F: FnMut(&[Triangle]),
{
    fn visit(&mut self, triangles: &[Triangle]) {
        self(triangles);
    }
}

/// Collects the visited triangles into one list, in visiting order.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<Triangle>,
}

impl CollectingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_triangles(self) -> Vec<Triangle> {
        self.collected
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.collected
    }
}

impl BspVisitor for CollectingVisitor {
    fn visit(&mut self, triangles: &[Triangle]) {
        self.collected.extend_from_slice(triangles);
    }
}

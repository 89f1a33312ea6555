//! Binary Space Partitioning tree for triangle soups.
//!
//! This module provides a BSP tree that partitions 3D space using planes
//! derived from the input triangles themselves. The tree enables:
//!
//! - Back-to-front traversal for depth-buffer-free rendering
//! - Front-to-back traversal for near-first queries
//! - Inspection of every node's plane and coplanar triangles
//!
//! # Example
//!
//! ```ignore
//! use bsp_raster::{BspTree, PointPool, Triangle};
//! use bsp_raster::bsp::CollectingVisitor;
//! use nalgebra::Point3;
//!
//! // Build a tree; split points are appended to the pool
//! let mut points: PointPool = /* shared points */;
//! let tree = BspTree::from_triangles(&mut points, triangles);
//!
//! // Traverse back-to-front for rendering
//! let eye = Point3::new(0.0, 0.0, 10.0);  // The location of the viewer
//! let mut visitor = CollectingVisitor::new();
//! tree.traverse_back_to_front(eye, &mut visitor);
//!
//! // Get triangles in paint order
//! let ordered = visitor.into_triangles();
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: The arena holding every node and the root id
//! - [`BspNode`]: A splitting plane, its coplanar triangles and child ids
//! - [`PlaneSelector`]: Strategy trait for choosing splitting planes
//! - [`BspVisitor`]: Visitor trait for custom traversal behavior

mod node;
mod selector;
mod tree;
mod visitor;

// Re-export main types
pub use node::{BspNode, NodeId};
pub use selector::{FirstTriangle, LeastSplits, PlaneSelector};
pub use tree::{BspTree, BuildOptions, DepthFirst, TraversalOptions, TraversalOrder};
pub use visitor::{BspVisitor, CollectingVisitor};

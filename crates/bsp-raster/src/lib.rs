//! BSP (Binary Space Partitioning) triangle renderer.
//!
//! Triangles sharing a [`PointPool`] are partitioned into a [`BspTree`] whose
//! splitting planes come from the triangles themselves, then drawn back to
//! front from any viewpoint without a depth buffer.

pub mod bsp;
mod classify;
mod color;
mod plane;
mod pool;
pub mod render;
pub mod scene;
mod split;
mod triangle;

pub use bsp::{
    BspNode, BspTree, BspVisitor, BuildOptions, FirstTriangle, LeastSplits, NodeId, PlaneSelector,
    TraversalOptions, TraversalOrder,
};
pub use classify::{classify_triangle, Placement, TriangleSides};
pub use color::Color;
pub use plane::{Plane, PlaneSide, ON_PLANE_EPSILON};
pub use pool::PointPool;
pub use render::{Camera, Framebuffer, PixelFormat, PixelSurface, RenderOptions};
pub use scene::{Geometry, Model, Partitioned, Scene, SceneError};
pub use split::{partition_triangle, Partition, SLIVER_RATIO};
pub use triangle::Triangle;

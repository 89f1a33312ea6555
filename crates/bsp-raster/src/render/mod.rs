//! Depth-buffer-free rendering of a [`BspTree`].
//!
//! The tree is walked back to front from the eye and every visited triangle
//! is projected with a view matrix and filled on top of what is already
//! there, so nearer triangles overwrite farther ones.
//!
//! - [`Camera`]: eye position and orientation, builds the view matrix
//! - [`PixelSurface`]: where pixels go; [`Framebuffer`] is the owned one
//! - [`fill_triangle`]: the scanline rasterizer

mod camera;
mod raster;
mod surface;

use log::trace;
use nalgebra::{Matrix4, Point2, Point3};

use crate::bsp::{BspTree, BspVisitor, NodeId, TraversalOptions, TraversalOrder};
use crate::{Color, PointPool, Triangle};

pub use camera::{perspective, screen_transform, Camera};
pub use raster::fill_triangle;
pub use surface::{Framebuffer, PixelFormat, PixelSurface};

/// Settings for [`render_tree`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub traversal: TraversalOptions,
    /// Color the surface is cleared to first. `None` draws over it.
    pub background: Option<Color>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            traversal: TraversalOptions::default(),
            background: Some(Color::BLACK),
        }
    }
}

impl RenderOptions {
    pub fn with_traversal(mut self, traversal: TraversalOptions) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }
}

/// Counts from one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles handed to the rasterizer.
    pub drawn: usize,
    /// Visited triangles with a vertex at or behind the eye.
    pub behind: usize,
}

/// Renders `tree` as seen from `camera` into `surface`.
pub fn render<S: PixelSurface + ?Sized>(
    tree: &BspTree,
    points: &PointPool,
    camera: &Camera,
    surface: &mut S,
    options: &RenderOptions,
) -> FrameStats {
    let view = camera.view_matrix(surface.width(), surface.height());
    render_tree(tree, points, camera.position, &view, surface, options)
}

/// Renders `tree` into `surface` back to front.
///
/// `eye` decides the traversal order and culling; `view` takes world points
/// to pixel coordinates after the perspective divide. Triangles with a
/// vertex whose `w` is not positive are skipped.
pub fn render_tree<S: PixelSurface + ?Sized>(
    tree: &BspTree,
    points: &PointPool,
    eye: Point3<f32>,
    view: &Matrix4<f32>,
    surface: &mut S,
    options: &RenderOptions,
) -> FrameStats {
    render_subtree(tree, tree.root(), points, eye, view, surface, options)
}

/// Like [`render_tree`], but draws only the subtree rooted at `start`.
///
/// With `start` set to `None` the surface is only cleared.
pub fn render_subtree<S: PixelSurface + ?Sized>(
    tree: &BspTree,
    start: Option<NodeId>,
    points: &PointPool,
    eye: Point3<f32>,
    view: &Matrix4<f32>,
    surface: &mut S,
    options: &RenderOptions,
) -> FrameStats {
    if let Some(background) = options.background {
        surface.clear(background);
    }

    let mut visitor = RasterVisitor {
        points,
        view,
        surface,
        stats: FrameStats::default(),
    };
    if let Some(start) = start {
        tree.traverse_subtree(
            start,
            eye,
            TraversalOrder::BackToFront,
            &options.traversal,
            &mut visitor,
        );
    }

    trace!("frame: {:?}", visitor.stats);
    visitor.stats
}

/// Projects and fills every visited triangle.
struct RasterVisitor<'a, S: PixelSurface + ?Sized> {
    points: &'a PointPool,
    view: &'a Matrix4<f32>,
    surface: &'a mut S,
    stats: FrameStats,
}

impl<S: PixelSurface + ?Sized> RasterVisitor<'_, S> {
    fn project(&self, point: Point3<f32>) -> Option<Point2<f32>> {
        let h = self.view * point.to_homogeneous();
        (h.w > 0.0).then(|| Point2::new(h.x / h.w, h.y / h.w))
    }
}

impl<S: PixelSurface + ?Sized> BspVisitor for RasterVisitor<'_, S> {
    fn visit(&mut self, triangles: &[Triangle]) {
        for triangle in triangles {
            let [a, b, c] = triangle.vertices(self.points);
            let (Some(a), Some(b), Some(c)) = (self.project(a), self.project(b), self.project(c))
            else {
                self.stats.behind += 1;
                continue;
            };

            let pixel = self.surface.pack(triangle.color());
            fill_triangle(&mut *self.surface, [a, b, c], pixel);
            self.stats.drawn += 1;
        }
    }
}

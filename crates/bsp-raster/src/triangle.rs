//! Indexed triangle representation.

use nalgebra::{Point3, Vector3};

use crate::{Color, Plane, PointPool};

/// A flat-colored triangle whose corners are indices into a [`PointPool`].
///
/// The winding order determines the normal direction via the right-hand rule:
/// normal = (p1 - p0) × (p2 - p0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    indices: [u32; 3],
    color: Color,
}

impl Triangle {
    /// Creates a new triangle from three point indices and a color.
    pub fn new(p0: u32, p1: u32, p2: u32, color: Color) -> Self {
        Self {
            indices: [p0, p1, p2],
            color,
        }
    }

    /// Returns the three point indices in winding order.
    #[inline]
    pub fn indices(&self) -> [u32; 3] {
        self.indices
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns a copy with every index shifted by `offset`.
    pub fn offset(&self, offset: u32) -> Self {
        let [p0, p1, p2] = self.indices;
        Self::new(p0 + offset, p1 + offset, p2 + offset, self.color)
    }

    /// Looks up the three corners in `points`.
    ///
    /// # Panics
    /// Panics if an index is out of range for `points`.
    #[inline]
    pub fn vertices(&self, points: &PointPool) -> [Point3<f32>; 3] {
        let [p0, p1, p2] = self.indices;
        [points[p0], points[p1], points[p2]]
    }

    /// Computes the (unnormalized) normal vector of the triangle.
    pub fn normal(&self, points: &PointPool) -> Vector3<f32> {
        let [a, b, c] = self.vertices(points);
        (b - a).cross(&(c - a))
    }

    /// Returns the plane that this triangle lies on.
    pub fn plane(&self, points: &PointPool) -> Plane {
        let [a, b, c] = self.vertices(points);
        Plane::from_points(a, b, c)
    }

    /// Computes the area of the triangle.
    pub fn area(&self, points: &PointPool) -> f32 {
        self.normal(points).norm() * 0.5
    }

    /// Returns true if the corners are collinear (zero area).
    pub fn is_degenerate(&self, points: &PointPool) -> bool {
        self.normal(points).norm_squared() == 0.0
    }

    /// Computes the centroid (center of mass) of the triangle.
    pub fn centroid(&self, points: &PointPool) -> Point3<f32> {
        let [a, b, c] = self.vertices(points);
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }
}

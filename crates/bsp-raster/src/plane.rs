//! Plane representation and point classification.

use nalgebra::{Point3, Vector3, Vector4};

/// Default tolerance for plane classification: the smallest positive
/// subnormal `f32`, so only an exactly zero distance counts as "on".
pub const ON_PLANE_EPSILON: f32 = f32::from_bits(1);

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    On,
}

impl PlaneSide {
    /// Two-bit code of this side: `Front = 0`, `Back = 1`, `On = 2`.
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            PlaneSide::Front => 0,
            PlaneSide::Back => 1,
            PlaneSide::On => 2,
        }
    }

    /// Returns the opposite side. `On` stays `On`.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            PlaneSide::Front => PlaneSide::Back,
            PlaneSide::Back => PlaneSide::Front,
            PlaneSide::On => PlaneSide::On,
        }
    }
}

/// A plane in 3D space, represented as `normal · point + d = 0`.
///
/// The normal is kept exactly as derived (usually a cross product of two
/// triangle edges) and is never normalized, so signed distances are scaled by
/// its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vector3<f32>,
    d: f32,
}

impl Plane {
    /// Creates a plane from its four coefficients `(nx, ny, nz)` and `d`.
    pub fn new(normal: Vector3<f32>, d: f32) -> Self {
        Self { normal, d }
    }

    /// Creates a plane from three points.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// Collinear points give a zero normal; every point then classifies as
    /// [`PlaneSide::On`].
    pub fn from_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = (b - a).cross(&(c - a));
        let d = -normal.dot(&a.coords);
        Self { normal, d }
    }

    /// Returns the (unnormalized) normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the constant term `d`.
    #[inline]
    pub fn d(&self) -> f32 {
        self.d
    }

    /// Returns the plane as `(nx, ny, nz, d)`.
    #[inline]
    pub fn coefficients(&self) -> Vector4<f32> {
        Vector4::new(self.normal.x, self.normal.y, self.normal.z, self.d)
    }

    /// Evaluates the plane equation at `point`.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind
    /// - Zero: point is on the plane
    ///
    /// The value is a distance scaled by the normal's length.
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) + self.d
    }

    /// Classifies which side of the plane a point lies on.
    /// Uses the default [`ON_PLANE_EPSILON`] tolerance.
    #[inline]
    pub fn classify_point(&self, point: Point3<f32>) -> PlaneSide {
        self.classify_point_with_epsilon(point, ON_PLANE_EPSILON)
    }

    /// Classifies which side of the plane a point lies on, with a custom epsilon.
    pub fn classify_point_with_epsilon(&self, point: Point3<f32>, epsilon: f32) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist.abs() < epsilon {
            PlaneSide::On
        } else if dist > 0.0 {
            PlaneSide::Front
        } else {
            PlaneSide::Back
        }
    }

    /// Returns `true` if the front face of the plane is visible from `eye`.
    #[inline]
    pub fn faces(&self, eye: Point3<f32>) -> bool {
        self.signed_distance(eye) > 0.0
    }

    /// Computes the point where the segment `start -> end` crosses the plane.
    ///
    /// The segment must straddle the plane: its endpoints have to lie on
    /// opposite sides. The crossing is interpolated from the same signed
    /// distances the classifier sees, so two distances of opposite sign always
    /// give a finite point on the segment, even when the segment is nearly
    /// parallel to the plane.
    pub fn intersect_segment(&self, start: Point3<f32>, end: Point3<f32>) -> Point3<f32> {
        let d_start = self.signed_distance(start);
        let d_end = self.signed_distance(end);
        debug_assert!(
            (d_start > 0.0) != (d_end > 0.0) && d_start != d_end,
            "segment does not cross the plane"
        );

        let p = d_end / (d_start - d_end);
        end + (end - start) * p
    }
}

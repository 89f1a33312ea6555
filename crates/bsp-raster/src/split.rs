//! Triangle cutting operations for BSP trees.

use log::trace;
use nalgebra::Point3;

use crate::classify::{classify_triangle, Placement};
use crate::{Plane, PlaneSide, PointPool, Triangle};

/// Triangles sorted relative to one splitting plane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Triangles (or fragments) in front of the plane.
    pub front: Vec<Triangle>,
    /// Triangles (or fragments) behind the plane.
    pub back: Vec<Triangle>,
    /// Triangles lying on the plane.
    pub coplanar: Vec<Triangle>,
}

impl Partition {
    /// Creates an empty partition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of triangles across all three lists.
    pub fn len(&self) -> usize {
        self.front.len() + self.back.len() + self.coplanar.len()
    }

    /// Returns true if no triangle has been sorted yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn side_mut(&mut self, side: PlaneSide) -> &mut Vec<Triangle> {
        match side {
            PlaneSide::Front => &mut self.front,
            PlaneSide::Back => &mut self.back,
            PlaneSide::On => &mut self.coplanar,
        }
    }
}

/// Sorts `triangle` into `out` relative to `plane`, cutting it if it spans
/// the plane.
///
/// New points created by a cut are appended to `points`; the fragments refer
/// to them by index and inherit the triangle's color and winding. A fragment
/// whose area is below [`SLIVER_RATIO`] of the triangle's is dropped: it
/// comes from a vertex a rounding error away from the plane, covers no
/// pixels and has no usable plane of its own.
///
/// # Return values by placement
///
/// - **Front** / **Back**: the triangle is pushed whole to that list
/// - **Coplanar**: the triangle is pushed whole to `out.coplanar`
/// - **SplitOutlier**: three points added, one fragment on the outlier's
///   side and three on the other
/// - **SplitOnVertex**: one point added, one fragment on each side
pub fn partition_triangle(
    points: &mut PointPool,
    plane: &Plane,
    triangle: Triangle,
    epsilon: f32,
    out: &mut Partition,
) -> Placement {
    let [a, b, c] = triangle.vertices(points);
    let sides = classify_triangle(plane, a, b, c, epsilon);
    let placement = sides.placement();

    match placement {
        Placement::Front => out.front.push(triangle),
        Placement::Back => out.back.push(triangle),
        Placement::Coplanar => out.coplanar.push(triangle),
        Placement::SplitOutlier { outlier } => {
            let (lone, rest) = split_outlier(points, plane, &triangle, outlier);
            let side = sides.side(outlier);
            let min_area = sliver_threshold(points, &triangle);
            keep_fragments(points, min_area, [lone], out.side_mut(side));
            keep_fragments(points, min_area, rest, out.side_mut(side.opposite()));
        }
        Placement::SplitOnVertex { on } => {
            let [first, second] = split_on_vertex(points, plane, &triangle, on);
            let min_area = sliver_threshold(points, &triangle);
            keep_fragments(points, min_area, [first], out.side_mut(sides.side((on + 1) % 3)));
            keep_fragments(points, min_area, [second], out.side_mut(sides.side((on + 2) % 3)));
        }
    }

    placement
}

/// Fragments smaller than this fraction of their triangle are dropped.
pub const SLIVER_RATIO: f32 = f32::EPSILON;

/// Doubled area below which a fragment of `triangle` counts as a sliver.
fn sliver_threshold(points: &PointPool, triangle: &Triangle) -> f32 {
    triangle.normal(points).norm() * SLIVER_RATIO
}

fn keep_fragments<const N: usize>(
    points: &PointPool,
    min_area: f32,
    fragments: [Triangle; N],
    out: &mut Vec<Triangle>,
) {
    for fragment in fragments {
        if fragment.normal(points).norm() < min_area || fragment.is_degenerate(points) {
            trace!("dropped sliver fragment {:?}", fragment.indices());
            continue;
        }
        out.push(fragment);
    }
}

/// Rotates the corners so that vertex `first` comes first, keeping winding.
#[inline]
fn rotated(indices: [u32; 3], first: usize) -> [u32; 3] {
    [
        indices[first],
        indices[(first + 1) % 3],
        indices[(first + 2) % 3],
    ]
}

/// Cuts a triangle whose vertex `outlier` is alone on its side of the plane.
///
/// With `A` the outlier and `B`, `C` the two others in winding order, the
/// new points are `mA` (midpoint of `B` and `C`), `mB` (on `A -> C`) and `mC`
/// (on `A -> B`). Returns the fragment on the outlier's side and the three
/// fragments covering the quad left on the other side:
///
/// ```text
///            A
///           / \
///       mC *---* mB      <- plane
///         / \ / \
///        B---*---C
///            mA
/// ```
fn split_outlier(
    points: &mut PointPool,
    plane: &Plane,
    triangle: &Triangle,
    outlier: usize,
) -> (Triangle, [Triangle; 3]) {
    let [ia, ib, ic] = rotated(triangle.indices(), outlier);
    let (a, b, c) = (points[ia], points[ib], points[ic]);

    let mid = Point3::from((b.coords + c.coords) * 0.5);
    let on_ac = plane.intersect_segment(a, c);
    let on_ab = plane.intersect_segment(a, b);

    let m_a = points.push(mid);
    let m_b = points.push(on_ac);
    let m_c = points.push(on_ab);
    trace!(
        "outlier split of {:?} at vertex {outlier}: points {m_a}..={m_c}",
        triangle.indices()
    );

    let color = triangle.color();
    (
        Triangle::new(ia, m_c, m_b, color),
        [
            Triangle::new(ib, m_a, m_c, color),
            Triangle::new(m_a, ic, m_b, color),
            Triangle::new(m_a, m_b, m_c, color),
        ],
    )
}

/// Cuts a triangle whose vertex `on` lies on the plane while the two others
/// are on opposite sides.
///
/// With `K` the on-plane vertex and `U`, `V` the others in winding order, one
/// point `m` is added on `U -> V`. Returns `(K, U, m)` and `(K, m, V)`.
fn split_on_vertex(
    points: &mut PointPool,
    plane: &Plane,
    triangle: &Triangle,
    on: usize,
) -> [Triangle; 2] {
    let [ik, iu, iv] = rotated(triangle.indices(), on);
    let m = points.push(plane.intersect_segment(points[iu], points[iv]));
    trace!("on-vertex split of {:?} at vertex {on}: point {m}", triangle.indices());

    let color = triangle.color();
    [
        Triangle::new(ik, iu, m, color),
        Triangle::new(ik, m, iv, color),
    ]
}

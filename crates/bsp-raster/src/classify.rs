//! Triangle classification against a splitting plane.
//!
//! Every vertex is classified on its own ([`PlaneSide`]); the three sides
//! are then dispatched through a case table into a [`Placement`] telling the
//! splitter what to do with the triangle.

use nalgebra::Point3;

use crate::{Plane, PlaneSide};

/// The sides of a triangle's three vertices, in vertex order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangleSides(pub [PlaneSide; 3]);

/// What the splitter does with a triangle, decided by its [`TriangleSides`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Every vertex is in front of or on the plane (not all on).
    Front,
    /// Every vertex is behind or on the plane (not all on).
    Back,
    /// All three vertices lie on the plane.
    Coplanar,
    /// No vertex is on the plane and vertex `outlier` is alone on its side.
    /// Splits into one triangle on the outlier's side and three on the other.
    SplitOutlier { outlier: usize },
    /// Vertex `on` lies on the plane and the other two are on opposite sides.
    /// Splits into one triangle on each side.
    SplitOnVertex { on: usize },
}

impl Placement {
    /// Cost of this placement for the plane-selection heuristic.
    ///
    /// Proportional to how many triangles the placement adds: the outlier
    /// split turns one triangle into four, the on-vertex split into two.
    #[inline]
    pub fn split_cost(self) -> u32 {
        match self {
            Placement::Front | Placement::Back | Placement::Coplanar => 1,
            Placement::SplitOnVertex { .. } => 2,
            Placement::SplitOutlier { .. } => 4,
        }
    }

    /// Returns true if the triangle has to be cut.
    #[inline]
    pub fn is_split(self) -> bool {
        matches!(
            self,
            Placement::SplitOutlier { .. } | Placement::SplitOnVertex { .. }
        )
    }
}

impl TriangleSides {
    /// Returns the side of vertex `index` (0, 1 or 2).
    #[inline]
    pub fn side(&self, index: usize) -> PlaneSide {
        self.0[index]
    }

    /// Packs the three sides into one byte, two bits per vertex:
    /// vertex 0 in bits 0-1, vertex 1 in bits 2-3, vertex 2 in bits 4-5.
    #[inline]
    pub fn packed(&self) -> u8 {
        let [a, b, c] = self.0;
        a.code() | (b.code() << 2) | (c.code() << 4)
    }

    /// Dispatches the side combination to a [`Placement`].
    pub fn placement(&self) -> Placement {
        use PlaneSide::{Back, Front, On};

        match (self.0[0], self.0[1], self.0[2]) {
            (On, On, On) => Placement::Coplanar,
            (Front | On, Front | On, Front | On) => Placement::Front,
            (Back | On, Back | On, Back | On) => Placement::Back,
            // Exactly one vertex on the plane, the other two on opposite sides.
            (On, _, _) => Placement::SplitOnVertex { on: 0 },
            (_, On, _) => Placement::SplitOnVertex { on: 1 },
            (_, _, On) => Placement::SplitOnVertex { on: 2 },
            // No vertex on the plane: one vertex is alone on its side.
            (Front, Back, Back) | (Back, Front, Front) => Placement::SplitOutlier { outlier: 0 },
            (Back, Front, Back) | (Front, Back, Front) => Placement::SplitOutlier { outlier: 1 },
            (Back, Back, Front) | (Front, Front, Back) => Placement::SplitOutlier { outlier: 2 },
        }
    }
}

/// Classifies the three vertices of a triangle against `plane`.
pub fn classify_triangle(
    plane: &Plane,
    a: Point3<f32>,
    b: Point3<f32>,
    c: Point3<f32>,
    epsilon: f32,
) -> TriangleSides {
    TriangleSides([
        plane.classify_point_with_epsilon(a, epsilon),
        plane.classify_point_with_epsilon(b, epsilon),
        plane.classify_point_with_epsilon(c, epsilon),
    ])
}

//! Plane selection strategies for BSP tree construction.
//!
//! The choice of splitting plane affects tree balance and the number of
//! triangle splits during construction. Different strategies offer different
//! trade-offs between build time and tree quality.

use crate::classify::classify_triangle;
use crate::{PointPool, Triangle};

/// Strategy for selecting which triangle's plane to use for splitting.
///
/// The selected triangle becomes the representative of a BSP node and its
/// plane the node's splitting plane.
pub trait PlaneSelector {
    /// Select a triangle from the slice to use as the splitting plane.
    ///
    /// Returns the index of the chosen triangle, or `None` if the slice is
    /// empty. `epsilon` is the classification tolerance the builder uses.
    fn select(&self, points: &PointPool, triangles: &[Triangle], epsilon: f32) -> Option<usize>;
}

/// Selects the first triangle in the list.
///
/// This is the simplest and fastest selector, but may produce unbalanced
/// trees and many splits depending on input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTriangle;

impl PlaneSelector for FirstTriangle {
    fn select(&self, _points: &PointPool, triangles: &[Triangle], _epsilon: f32) -> Option<usize> {
        if triangles.is_empty() { None } else { Some(0) }
    }
}

/// Selects the triangle whose plane creates the fewest new triangles.
///
/// Every candidate's plane is scored against every other triangle in the set
/// with [`Placement::split_cost`](crate::Placement::split_cost): 1 for a
/// triangle that stays whole, 2 for an on-vertex split and 4 for an outlier
/// split. The lowest total wins and ties go to the earliest candidate.
///
/// Costs O(n²) classifications per node.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSplits;

impl LeastSplits {
    /// Scores the plane of `triangles[candidate]` against the rest of the set.
    pub fn score(
        &self,
        points: &PointPool,
        triangles: &[Triangle],
        candidate: usize,
        epsilon: f32,
    ) -> u32 {
        let plane = triangles[candidate].plane(points);
        triangles
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != candidate)
            .map(|(_, other)| {
                let [a, b, c] = other.vertices(points);
                classify_triangle(&plane, a, b, c, epsilon)
                    .placement()
                    .split_cost()
            })
            .sum()
    }
}

impl PlaneSelector for LeastSplits {
    fn select(&self, points: &PointPool, triangles: &[Triangle], epsilon: f32) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for candidate in 0..triangles.len() {
            // A collinear triangle has no plane; every other triangle would
            // count as coplanar with it.
            if triangles[candidate].is_degenerate(points) {
                continue;
            }
            let score = self.score(points, triangles, candidate, epsilon);
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((candidate, score));
            }
        }
        match best {
            Some((index, _)) => Some(index),
            None if triangles.is_empty() => None,
            None => Some(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, ON_PLANE_EPSILON};
    use nalgebra::Point3;

    fn make_pool(points: &[[f32; 3]]) -> PointPool {
        points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect()
    }

    fn make_triangle(p0: u32, p1: u32, p2: u32) -> Triangle {
        Triangle::new(p0, p1, p2, Color::WHITE)
    }

    #[test]
    fn first_triangle_empty_list() {
        let points = PointPool::new();
        assert!(FirstTriangle.select(&points, &[], ON_PLANE_EPSILON).is_none());
        assert!(LeastSplits.select(&points, &[], ON_PLANE_EPSILON).is_none());
    }

    #[test]
    fn first_triangle_multiple() {
        let points = make_pool(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let triangles = vec![make_triangle(0, 1, 2), make_triangle(0, 2, 1)];
        assert_eq!(FirstTriangle.select(&points, &triangles, ON_PLANE_EPSILON), Some(0));
    }

    #[test]
    fn least_splits_single() {
        let points = make_pool(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let triangles = vec![make_triangle(0, 1, 2)];
        assert_eq!(LeastSplits.score(&points, &triangles, 0, ON_PLANE_EPSILON), 0);
        assert_eq!(LeastSplits.select(&points, &triangles, ON_PLANE_EPSILON), Some(0));
    }

    #[test]
    fn least_splits_avoids_cutting_plane() {
        // A vertical triangle at x = 0 would cut the raised triangle; the
        // floor triangles at z = 0 leave everything whole.
        let points = make_pool(&[
            [0.0, -5.0, 1.0],  // 0
            [0.0, 5.0, 1.0],   // 1
            [0.0, 0.0, 3.0],   // 2
            [-2.0, 0.0, 0.0],  // 3
            [-1.0, 0.0, 0.0],  // 4
            [-2.0, 1.0, 0.0],  // 5
            [1.0, 0.0, 0.0],   // 6
            [2.0, 0.0, 0.0],   // 7
            [1.0, 1.0, 0.0],   // 8
            [-2.0, 0.0, 1.0],  // 9
            [2.0, 0.0, 1.0],   // 10
            [0.0, 0.5, 2.0],   // 11
        ]);
        let triangles = vec![
            make_triangle(0, 1, 2),
            make_triangle(3, 4, 5),
            make_triangle(6, 7, 8),
            make_triangle(9, 10, 11),
        ];

        let eps = ON_PLANE_EPSILON;
        // Two whole triangles plus an on-vertex split.
        assert_eq!(LeastSplits.score(&points, &triangles, 0, eps), 4);
        assert_eq!(LeastSplits.score(&points, &triangles, 1, eps), 3);
        assert_eq!(LeastSplits.score(&points, &triangles, 2, eps), 3);
        // Cuts the vertical triangle with an outlier split.
        assert_eq!(LeastSplits.score(&points, &triangles, 3, eps), 6);
        assert_eq!(LeastSplits.select(&points, &triangles, eps), Some(1));
    }

    #[test]
    fn least_splits_ties_pick_first() {
        // Two parallel triangles score 1 each.
        let points = make_pool(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
        ]);
        let triangles = vec![make_triangle(3, 4, 5), make_triangle(0, 1, 2)];
        assert_eq!(LeastSplits.select(&points, &triangles, ON_PLANE_EPSILON), Some(0));
    }

    #[test]
    fn least_splits_skips_collinear_candidates() {
        let points = make_pool(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
        ]);
        let line = make_triangle(0, 1, 2);
        let flat = make_triangle(3, 4, 5);

        let selected = LeastSplits.select(&points, &[line, flat], ON_PLANE_EPSILON);
        assert_eq!(selected, Some(1));
        assert_eq!(LeastSplits.select(&points, &[line], ON_PLANE_EPSILON), Some(0));
    }
}

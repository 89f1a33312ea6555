//! Shared, append-only pool of points addressed by `u32` indices.

use std::ops::Index;

use nalgebra::Point3;

/// The point storage shared by every triangle of a scene.
///
/// Points are only ever appended. An index handed out by [`PointPool::push`]
/// stays valid, and keeps referring to the same coordinate, for the lifetime
/// of the pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointPool {
    points: Vec<Point3<f32>>,
}

impl PointPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty pool with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Appends a point and returns its index.
    ///
    /// # Panics
    /// Panics if the pool already holds `u32::MAX + 1` points.
    pub fn push(&mut self, point: Point3<f32>) -> u32 {
        let index = u32::try_from(self.points.len()).expect("point pool exceeds u32 index range");
        self.points.push(point);
        index
    }

    /// Returns the point at `index`, if it exists.
    #[inline]
    pub fn get(&self, index: u32) -> Option<Point3<f32>> {
        self.points.get(index as usize).copied()
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the pool holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns all points in index order.
    #[inline]
    pub fn as_slice(&self) -> &[Point3<f32>] {
        &self.points
    }
}

impl Index<u32> for PointPool {
    type Output = Point3<f32>;

    #[inline]
    fn index(&self, index: u32) -> &Self::Output {
        &self.points[index as usize]
    }
}

impl From<Vec<Point3<f32>>> for PointPool {
    fn from(points: Vec<Point3<f32>>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point3<f32>> for PointPool {
    fn from_iter<I: IntoIterator<Item = Point3<f32>>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_sequential_indices() {
        let mut pool = PointPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.push(Point3::new(1.0, 0.0, 0.0)), 0);
        assert_eq!(pool.push(Point3::new(0.0, 1.0, 0.0)), 1);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[1], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn push_never_moves_existing_points() {
        let mut pool = PointPool::from(vec![Point3::new(1.0, 2.0, 3.0)]);
        for i in 0..100 {
            pool.push(Point3::new(i as f32, 0.0, 0.0));
        }
        assert_eq!(pool.get(0), Some(Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(pool.get(101), None);
    }
}

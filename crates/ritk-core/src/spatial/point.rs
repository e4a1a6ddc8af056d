//! Point type for voxel-index and physical coordinates.

use nalgebra::Point as NaPoint;
use serde::{Serialize, Deserialize};
use super::Vector;

/// A point in D-dimensional space.
///
/// The same type holds continuous voxel indices and physical positions;
/// which frame a point lives in is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<const D: usize>(pub NaPoint<f64, D>);

impl<const D: usize> Point<D> {
    /// Create a new point from coordinates.
    pub fn new(coords: [f64; D]) -> Self {
        Self(NaPoint::from(coords))
    }

    /// The origin (all coordinates zero).
    pub fn origin() -> Self {
        Self(NaPoint::origin())
    }

    /// Coordinates as a vector from the origin.
    pub fn coords(&self) -> Vector<D> {
        Vector(self.0.coords)
    }

    /// Multiply each coordinate by the matching per-axis factor.
    pub fn scale_axes(&mut self, factors: &Vector<D>) {
        self.0.coords.component_mul_assign(&factors.0);
    }

    /// Get the inner nalgebra point.
    pub fn inner(&self) -> &NaPoint<f64, D> {
        &self.0
    }
}

impl<const D: usize> std::ops::Index<usize> for Point<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0.coords[index]
    }
}

impl<const D: usize> std::ops::IndexMut<usize> for Point<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0.coords[index]
    }
}

impl<const D: usize> std::ops::Sub for Point<D> {
    type Output = Vector<D>;

    fn sub(self, other: Self) -> Self::Output {
        Vector(self.0.coords - other.0.coords)
    }
}

impl<const D: usize> std::ops::Add<Vector<D>> for Point<D> {
    type Output = Self;

    fn add(self, vector: Vector<D>) -> Self::Output {
        Self(self.0 + vector.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Point3 = Point<3>;
    type Vector3 = Vector<3>;

    #[test]
    fn test_scale_axes() {
        let mut p = Point3::new([2.0, 3.0, 4.0]);
        p.scale_axes(&Vector3::new([0.5, 2.0, 1.0]));
        assert_eq!(p, Point3::new([1.0, 6.0, 4.0]));
    }

    #[test]
    fn test_point_vector_arithmetic() {
        let p1 = Point3::new([5.0, 5.0, 5.0]);
        let p2 = Point3::new([2.0, 3.0, 4.0]);
        assert_eq!(p1 - p2, Vector3::new([3.0, 2.0, 1.0]));
        assert_eq!(p2 + Vector3::new([1.0, 1.0, 1.0]), Point3::new([3.0, 4.0, 5.0]));
    }
}

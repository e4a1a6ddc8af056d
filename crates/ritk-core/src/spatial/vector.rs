//! Vector type for displacements, per-axis factors and spacings.

use nalgebra::SVector;
use serde::{Serialize, Deserialize};

/// A vector in D-dimensional space.
///
/// Besides plain displacements, vectors carry per-axis quantities such as
/// voxel spacing or resampling factors, so component-wise operations are
/// provided alongside the usual arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector<const D: usize>(pub SVector<f64, D>);

impl<const D: usize> Vector<D> {
    /// Create a new vector from components.
    pub fn new(components: [f64; D]) -> Self {
        Self(SVector::from(components))
    }

    /// Create a zero vector.
    pub fn zeros() -> Self {
        Self(SVector::zeros())
    }

    /// Create a vector with every component set to `value`.
    pub fn repeat(value: f64) -> Self {
        Self(SVector::repeat(value))
    }

    /// Components as a fixed-size array.
    pub fn to_array(&self) -> [f64; D] {
        let mut out = [0.0; D];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.0[i];
        }
        out
    }

    /// Component-wise product.
    pub fn component_mul(&self, other: &Self) -> Self {
        Self(self.0.component_mul(&other.0))
    }

    /// Component-wise quotient.
    pub fn component_div(&self, other: &Self) -> Self {
        Self(self.0.component_div(&other.0))
    }

    /// Product of all components.
    pub fn product(&self) -> f64 {
        self.0.iter().product()
    }

    /// Get the inner nalgebra vector.
    pub fn inner(&self) -> &SVector<f64, D> {
        &self.0
    }

    /// Get mutable reference to inner nalgebra vector.
    pub fn inner_mut(&mut self) -> &mut SVector<f64, D> {
        &mut self.0
    }
}

impl<const D: usize> std::ops::Index<usize> for Vector<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<usize> for Vector<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Add for Vector<D> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self(self.0 + other.0)
    }
}

impl<const D: usize> std::ops::Sub for Vector<D> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self(self.0 - other.0)
    }
}

impl<const D: usize> std::ops::Mul<f64> for Vector<D> {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self(self.0 * scalar)
    }
}

//! Affine transform in physical space.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use nalgebra::{Matrix3, Vector3};
use serde::{Serialize, Deserialize};
use super::trait_::Transform;
use crate::image::image::apply_rows;
use crate::spatial::Vector;

/// `T(x) = A x + t` on 3-D physical points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    matrix: Matrix3<f64>,
    translation: Vector3<f64>,
}

impl AffineTransform {
    /// Create a transform from its linear part and translation.
    pub fn new(matrix: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self { matrix, translation }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    /// Linear part `A`.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Translation `t`.
    pub fn translation(&self) -> &Vector3<f64> {
        &self.translation
    }

    /// Apply to a single point.
    pub fn apply(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.matrix * point + self.translation
    }
}

impl<B: Backend> Transform<B> for AffineTransform {
    fn transform_points(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        apply_rows::<B, 3>(points, &self.matrix, &Vector(self.translation))
    }
}

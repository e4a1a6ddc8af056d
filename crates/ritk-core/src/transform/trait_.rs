//! Transform trait for mapping batches of physical points.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;

/// Maps points from one physical space to another.
///
/// Resampling evaluates the transform on output-grid points to find where to
/// sample the input image, so implementations describe the output -> input
/// direction.
pub trait Transform<B: Backend> {
    /// Apply the transform to `[Batch, 3]` physical points.
    fn transform_points(&self, points: Tensor<B, 2>) -> Tensor<B, 2>;
}

//! Interpolator trait for sampling volumes at continuous indices.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;

/// Samples a volume at continuous voxel indices.
///
/// Indices outside the volume are clamped to the border.
pub trait Interpolator<B: Backend> {
    /// Interpolate values from a volume.
    ///
    /// # Arguments
    /// * `data` - Volume in tensor order `[Z, Y, X]`
    /// * `indices` - Continuous indices `[Batch, 3]` in coordinate order `(x, y, z)`
    ///
    /// # Returns
    /// Tensor of sampled values `[Batch]`
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Tensor<B, 1>;
}

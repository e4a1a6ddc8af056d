//! Nearest neighbor interpolation.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use super::trait_::Interpolator;

/// Nearest neighbor interpolator (rounds to the closest voxel).
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    /// Create a new nearest neighbor interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for NearestNeighborInterpolator {
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Tensor<B, 1> {
        let [nz, ny, nx] = data.dims();
        let round = |axis: usize, extent: usize| {
            indices
                .clone()
                .narrow(1, axis, 1)
                .squeeze::<1>(1)
                .round()
                .clamp(0.0, (extent - 1) as f64)
                .int()
        };

        let offset = round(0, nx) + round(1, ny) * (nx as i32) + round(2, nz) * ((nx * ny) as i32);
        data.clone().reshape([nz * ny * nx]).gather(0, offset)
    }
}

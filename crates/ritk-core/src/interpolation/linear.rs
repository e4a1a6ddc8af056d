//! Trilinear interpolation.

use burn::tensor::{Tensor, Int};
use burn::tensor::backend::Backend;
use super::trait_::Interpolator;

/// Trilinear interpolator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for LinearInterpolator {
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Tensor<B, 1> {
        let [nz, ny, nx] = data.dims();
        let batch_size = indices.dims()[0];
        let device = indices.device();
        let flat_data = data.clone().reshape([nz * ny * nx]);

        let extents = [nx, ny, nz];
        let mut lower: Vec<Tensor<B, 1, Int>> = Vec::with_capacity(3);
        let mut upper: Vec<Tensor<B, 1, Int>> = Vec::with_capacity(3);
        let mut weights: Vec<Tensor<B, 1>> = Vec::with_capacity(3);

        for (axis, &extent) in extents.iter().enumerate() {
            let coord = indices.clone().narrow(1, axis, 1).squeeze::<1>(1);
            let floor = coord.clone().floor();
            let max = (extent - 1) as f64;

            weights.push(coord - floor.clone());
            lower.push(floor.clone().clamp(0.0, max).int());
            upper.push((floor + 1.0).clamp(0.0, max).int());
        }

        let stride_y = nx as i32;
        let stride_z = (nx * ny) as i32;

        let mut result = Tensor::<B, 1>::zeros([batch_size], &device);
        for corner in 0..8usize {
            // Bit k of `corner` selects the upper neighbour along axis k.
            let pick = |axis: usize| {
                if corner & (1 << axis) != 0 {
                    (upper[axis].clone(), weights[axis].clone())
                } else {
                    (lower[axis].clone(), weights[axis].clone().neg() + 1.0)
                }
            };
            let (ix, wx) = pick(0);
            let (iy, wy) = pick(1);
            let (iz, wz) = pick(2);

            let offset = ix + iy * stride_y + iz * stride_z;
            result = result + flat_data.clone().gather(0, offset) * wx * wy * wz;
        }

        result
    }
}

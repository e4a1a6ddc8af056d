use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;

/// Continuous indices of every voxel of an image with the given shape.
///
/// `shape` is in tensor order (slowest axis first, e.g. `[Z, Y, X]`); the
/// returned `[N, D]` tensor lists indices in coordinate order (`x, y, z`),
/// visiting voxels in memory order.
pub fn voxel_grid<B: Backend, const D: usize>(
    shape: [usize; D],
    device: &B::Device,
) -> Tensor<B, 2> {
    let total: usize = shape.iter().product();
    let mut grid = Vec::with_capacity(total * D);
    let mut index = [0usize; D];

    for _ in 0..total {
        grid.extend(index.iter().rev().map(|&i| i as f32));

        // Odometer increment, fastest axis last.
        for axis in (0..D).rev() {
            index[axis] += 1;
            if index[axis] < shape[axis] {
                break;
            }
            index[axis] = 0;
        }
    }

    Tensor::<B, 1>::from_data(TensorData::new(grid, Shape::new([total * D])), device)
        .reshape([total, D])
}

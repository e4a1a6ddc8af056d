//! Image type with physical metadata and coordinate transformations.

use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;
use nalgebra::SMatrix;
use crate::spatial::{Point, Spacing, Direction, Vector};

/// Volumetric image with physical metadata.
///
/// # Coordinate Systems
/// * **Index Space**: continuous voxel indices, listed in coordinate order
///   (`x, y, z`). The tensor itself is stored slowest axis first
///   (`[Z, Y, X]`), so `shape()` is reversed relative to index order.
/// * **Physical Space**: `point = origin + direction * (index ⊙ spacing)`,
///   usually in millimetres.
///
/// `spacing` is indexed in coordinate order: `spacing[0]` is the voxel size
/// along x.
///
/// # Examples
/// ```rust
/// use ritk_core::Image;
/// use ritk_core::spatial::{Point3, Spacing3, Direction3};
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let data = Tensor::<Backend, 3>::zeros([4, 8, 8], &device);
/// let image = Image::new(data, Point3::origin(), Spacing3::new([0.5, 0.5, 2.0]), Direction3::identity());
/// assert_eq!(image.size(), [8, 8, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend, const D: usize> {
    data: Tensor<B, D>,
    origin: Point<D>,
    spacing: Spacing<D>,
    direction: Direction<D>,
}

impl<B: Backend, const D: usize> Image<B, D> {
    /// Create a new image with the given data and metadata.
    pub fn new(
        data: Tensor<B, D>,
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Self {
        Self {
            data,
            origin,
            spacing,
            direction,
        }
    }

    /// Build an axis-aligned image at the origin from raw voxel values.
    ///
    /// `shape` is in tensor order (`[Z, Y, X]` for volumes) and `values` are
    /// laid out with x varying fastest.
    pub fn from_voxels(
        values: Vec<f32>,
        shape: [usize; D],
        spacing: Spacing<D>,
        device: &B::Device,
    ) -> Self {
        let data = Tensor::<B, D>::from_data(TensorData::new(values, Shape::new(shape)), device);
        Self::new(data, Point::origin(), spacing, Direction::identity())
    }

    /// Voxel data tensor.
    pub fn data(&self) -> &Tensor<B, D> {
        &self.data
    }

    /// Physical coordinate of voxel index zero.
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Physical voxel size per axis, in coordinate order.
    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Orientation matrix of the image axes.
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Tensor shape, slowest axis first.
    pub fn shape(&self) -> [usize; D] {
        self.data.dims()
    }

    /// Number of voxels per axis in coordinate order (`[nx, ny, nz]`).
    pub fn size(&self) -> [usize; D] {
        let mut size = self.shape();
        size.reverse();
        size
    }

    /// Map a physical point to a continuous index.
    pub fn physical_to_index(&self, point: &Point<D>) -> Point<D> {
        let inv_dir = self.direction.try_inverse().expect("Direction matrix must be invertible");
        let rotated = inv_dir * (*point - self.origin);
        Point(rotated.component_div(&self.spacing).0.into())
    }

    /// Map a continuous index to a physical point.
    pub fn index_to_physical(&self, index: &Point<D>) -> Point<D> {
        let scaled = index.coords().component_mul(&self.spacing);
        self.origin + self.direction * scaled
    }

    /// Matrix `M` with `index = M * (point - origin)`.
    pub fn physical_to_index_matrix(&self) -> SMatrix<f64, D, D> {
        let inv_dir = self.direction.try_inverse().expect("Direction matrix must be invertible");
        SMatrix::<f64, D, D>::from_diagonal(&self.spacing.recip().0) * inv_dir.0
    }

    /// Matrix `M` with `point = origin + M * index`.
    pub fn index_to_physical_matrix(&self) -> SMatrix<f64, D, D> {
        self.direction.0 * SMatrix::<f64, D, D>::from_diagonal(&self.spacing.0)
    }

    /// Batch version of [`Image::physical_to_index`] for `[N, D]` tensors.
    pub fn world_to_index_tensor(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        let m = self.physical_to_index_matrix();
        // index = M p - M o
        let offset = -(m * self.origin.coords().0);
        apply_rows::<B, D>(points, &m, &Vector(offset))
    }
}

/// `rows @ M^T + offset` for a `[N, D]` tensor of row vectors.
pub(crate) fn apply_rows<B: Backend, const D: usize>(
    rows: Tensor<B, 2>,
    m: &SMatrix<f64, D, D>,
    offset: &Vector<D>,
) -> Tensor<B, 2> {
    let device = rows.device();

    let mut m_t = Vec::with_capacity(D * D);
    for r in 0..D {
        for c in 0..D {
            m_t.push(m[(c, r)] as f32);
        }
    }
    let m_t = Tensor::<B, 1>::from_data(TensorData::new(m_t, Shape::new([D * D])), &device)
        .reshape([D, D]);

    let offset: Vec<f32> = offset.0.iter().map(|&x| x as f32).collect();
    let offset = Tensor::<B, 1>::from_data(TensorData::new(offset, Shape::new([D])), &device)
        .reshape([1, D]);

    rows.matmul(m_t) + offset
}

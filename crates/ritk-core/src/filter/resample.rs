//! Resample image filter.
//!
//! Resamples a volume onto a new voxel grid through a physical-space
//! transform and an interpolator.

use std::marker::PhantomData;
use burn::tensor::{Shape, backend::Backend};
use nalgebra::Matrix3;
use crate::image::{Image, voxel_grid};
use crate::image::image::apply_rows;
use crate::interpolation::{Interpolator, InterpolationMode, LinearInterpolator, NearestNeighborInterpolator};
use crate::spatial::{Point, Spacing, Direction};
use crate::transform::{Transform, AffineTransform};

/// Resample image filter.
///
/// For every voxel of the output grid, the output physical point is mapped
/// through `transform` (output -> input physical space), converted to a
/// continuous input index and interpolated.
pub struct ResampleImageFilter<B, T, I>
where
    B: Backend,
    T: Transform<B>,
    I: Interpolator<B>,
{
    shape: [usize; 3],
    origin: Point<3>,
    spacing: Spacing<3>,
    direction: Direction<3>,
    transform: T,
    interpolator: I,
    _phantom: PhantomData<B>,
}

impl<B, T, I> ResampleImageFilter<B, T, I>
where
    B: Backend,
    T: Transform<B>,
    I: Interpolator<B>,
{
    /// Create a new resample filter.
    ///
    /// # Arguments
    /// * `shape` - Output tensor shape `[Z, Y, X]`
    /// * `origin` - Output image origin (physical)
    /// * `spacing` - Output image spacing (physical)
    /// * `direction` - Output image direction (matrix)
    /// * `transform` - Transform from output space to input space
    /// * `interpolator` - Interpolator for input image sampling
    pub fn new(
        shape: [usize; 3],
        origin: Point<3>,
        spacing: Spacing<3>,
        direction: Direction<3>,
        transform: T,
        interpolator: I,
    ) -> Self {
        Self {
            shape,
            origin,
            spacing,
            direction,
            transform,
            interpolator,
            _phantom: PhantomData,
        }
    }

    /// Use the grid (shape, origin, spacing, direction) of `reference` as output.
    pub fn new_from_reference(reference: &Image<B, 3>, transform: T, interpolator: I) -> Self {
        Self::new(
            reference.shape(),
            *reference.origin(),
            *reference.spacing(),
            *reference.direction(),
            transform,
            interpolator,
        )
    }

    /// Apply filter to an input image.
    pub fn apply(&self, input: &Image<B, 3>) -> Image<B, 3> {
        let device = input.data().device();

        let output_indices = voxel_grid::<B, 3>(self.shape, &device);
        let index_to_physical = self.direction.0 * Matrix3::from_diagonal(&self.spacing.0);
        let output_points = apply_rows::<B, 3>(output_indices, &index_to_physical, &self.origin.coords());
        let input_points = self.transform.transform_points(output_points);
        let input_indices = input.world_to_index_tensor(input_points);

        let values = self.interpolator.interpolate(input.data(), input_indices);
        Image::new(
            values.reshape(Shape::new(self.shape)),
            self.origin,
            self.spacing,
            self.direction,
        )
    }
}

/// Tensor shape of `input` once resampled to `spacing`, covering the same
/// physical extent: `ceil(n * old / new)` voxels per axis, at least one.
pub fn resampled_size<B: Backend>(input: &Image<B, 3>, spacing: &Spacing<3>) -> [usize; 3] {
    let size = input.size();
    let old = input.spacing();
    let mut shape = [0usize; 3];
    for axis in 0..3 {
        let extent = size[axis] as f64 * old[axis] / spacing[axis];
        // Tensor order is reversed relative to coordinate order.
        shape[2 - axis] = (extent.ceil() as usize).max(1);
    }
    shape
}

/// Resample `input` to a new voxel spacing, keeping origin and direction.
///
/// `spacing` must be valid (finite and positive on every axis).
pub fn resample_to_spacing<B: Backend>(
    input: &Image<B, 3>,
    spacing: &Spacing<3>,
    mode: InterpolationMode,
) -> Image<B, 3> {
    let shape = resampled_size(input, spacing);
    match mode {
        InterpolationMode::Linear => ResampleImageFilter::new(
            shape,
            *input.origin(),
            *spacing,
            *input.direction(),
            AffineTransform::identity(),
            LinearInterpolator::new(),
        )
        .apply(input),
        InterpolationMode::Nearest => ResampleImageFilter::new(
            shape,
            *input.origin(),
            *spacing,
            *input.direction(),
            AffineTransform::identity(),
            NearestNeighborInterpolator::new(),
        )
        .apply(input),
    }
}

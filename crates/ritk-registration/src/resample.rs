//! Resampling images to a new voxel size.

use burn::tensor::backend::Backend;
use ritk_core::filter::resample_to_spacing;
use ritk_core::spatial::Spacing3;
use ritk_core::{Image, InterpolationMode};
use crate::error::BoxError;
use crate::validation::validate_units;

/// Resamples a volume to a target spacing over the same physical extent.
pub trait Resampler<B: Backend> {
    fn resample(
        &self,
        image: &Image<B, 3>,
        spacing: &Spacing3,
        interpolation: InterpolationMode,
    ) -> Result<Image<B, 3>, BoxError>;
}

/// Default resampler built on [`ritk_core::filter::ResampleImageFilter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacingResampler;

impl SpacingResampler {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Resampler<B> for SpacingResampler {
    fn resample(
        &self,
        image: &Image<B, 3>,
        spacing: &Spacing3,
        interpolation: InterpolationMode,
    ) -> Result<Image<B, 3>, BoxError> {
        validate_units(spacing)?;
        validate_units(image.spacing())?;
        if image.direction().try_inverse().is_none() {
            return Err("direction matrix is singular".into());
        }
        Ok(resample_to_spacing(image, spacing, interpolation))
    }
}

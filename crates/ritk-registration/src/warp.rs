//! Warping a source image onto the reference grid with a registration result.

use burn::tensor::backend::Backend;
use ritk_core::filter::ResampleImageFilter;
use ritk_core::interpolation::{LinearInterpolator, NearestNeighborInterpolator};
use ritk_core::transform::AffineTransform;
use ritk_core::{Image, InterpolationMode};
use crate::error::{RegistrationError, Result};
use crate::transform::Affine;

/// Resample `source` onto the voxel grid of `reference`.
///
/// `affine` maps reference voxel coordinates to source voxel coordinates,
/// as produced by [`RegistrationSession::register`](crate::RegistrationSession::register).
/// It is lifted to a physical-space transform using both images' origin,
/// spacing and direction.
pub fn warp_source_to_reference<B: Backend>(
    source: &Image<B, 3>,
    reference: &Image<B, 3>,
    affine: &Affine,
    interpolation: InterpolationMode,
) -> Result<Image<B, 3>> {
    let physical = physical_affine(source, reference, affine)?;
    tracing::debug!("Warping source onto a {:?} reference grid", reference.shape());

    let warped = match interpolation {
        InterpolationMode::Linear => {
            ResampleImageFilter::new_from_reference(reference, physical, LinearInterpolator::new()).apply(source)
        }
        InterpolationMode::Nearest => {
            ResampleImageFilter::new_from_reference(reference, physical, NearestNeighborInterpolator::new())
                .apply(source)
        }
    };
    Ok(warped)
}

/// Physical reference -> physical source transform for a voxel-space affine.
fn physical_affine<B: Backend>(
    source: &Image<B, 3>,
    reference: &Image<B, 3>,
    affine: &Affine,
) -> Result<AffineTransform> {
    affine.check_shape()?;
    if affine.matrix.iter().any(|v| !v.is_finite()) {
        return Err(RegistrationError::non_finite("affine parameters are not finite"));
    }
    if reference.direction().try_inverse().is_none() {
        return Err(RegistrationError::invalid_argument("reference direction is singular"));
    }
    // The resample filter maps into source indices.
    if source.direction().try_inverse().is_none() {
        return Err(RegistrationError::invalid_argument("source direction is singular"));
    }

    // p_src = S (A R (p_ref - o_ref) + t) + o_src
    let s = source.index_to_physical_matrix();
    let r = reference.physical_to_index_matrix();
    let linear = s * affine.linear() * r;
    let offset = source.origin().coords().0 + s * affine.translation() - linear * reference.origin().coords().0;

    Ok(AffineTransform::new(linear, offset))
}

//! Rescaling of features found in a resampled image.
//!
//! When an image is resampled by per-axis factors before detection, the
//! features come out in the resampled voxel grid. Applying the factors that
//! map resampled voxels back onto the original grid restores positions in the
//! original image; scales and orientations are adjusted so that the volume
//! element stays consistent.

use ritk_core::spatial::Vector3;
use super::{Descriptor, Keypoint};

/// Rescale keypoints and descriptors in place by per-axis `factors`.
///
/// With `det = f0 * f1 * f2`, positions are multiplied component-wise by the
/// factors, scales by `det^(-1/3)`, and column `j` of each orientation matrix
/// by `f[j] / det`. Descriptor feature vectors are left untouched.
///
/// Factors must be finite and positive.
pub fn scale_features(factors: &Vector3, keypoints: &mut [Keypoint], descriptors: &mut [Descriptor]) {
    let det = factors.product();
    let scale_factor = det.powf(-1.0 / 3.0);

    for keypoint in keypoints.iter_mut() {
        keypoint.position.scale_axes(factors);
        keypoint.scale *= scale_factor;
        for j in 0..3 {
            let column_factor = factors[j] / det;
            for i in 0..3 {
                keypoint.orientation[(i, j)] *= column_factor;
            }
        }
    }

    for descriptor in descriptors.iter_mut() {
        descriptor.position.scale_axes(factors);
        descriptor.scale *= scale_factor;
    }
}

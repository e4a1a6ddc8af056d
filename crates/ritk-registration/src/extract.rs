//! Keypoint detection and descriptor extraction.

use burn::tensor::backend::Backend;
use ritk_core::Image;
use crate::config::DetectorConfig;
use crate::error::BoxError;
use crate::features::{DescriptorStore, KeypointStore};

/// Scale-space feature extractor.
///
/// Positions are reported in voxel coordinates of the image passed in.
pub trait FeatureExtractor<B: Backend> {
    /// Detect keypoints in `image`.
    fn detect(&self, image: &Image<B, 3>, config: &DetectorConfig) -> Result<KeypointStore, BoxError>;

    /// Compute one descriptor per keypoint.
    fn extract(
        &self,
        image: &Image<B, 3>,
        keypoints: &KeypointStore,
        config: &DetectorConfig,
    ) -> Result<DescriptorStore, BoxError>;
}

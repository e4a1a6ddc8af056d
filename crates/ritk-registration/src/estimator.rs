//! Robust transform estimation.

use crate::config::RansacConfig;
use crate::coordinates::CoordMatrix;
use crate::error::BoxError;
use crate::transform::Transform;

/// RANSAC-style estimator fitting a transform to point correspondences.
pub trait RobustEstimator {
    /// Fit `transform` so that it maps row `k` of `reference` onto row `k`
    /// of `source`.
    ///
    /// Both matrices are `[N, 3]` physical coordinates. The variant of
    /// `transform` selects the model family; its parameters are overwritten.
    fn estimate(
        &self,
        config: &RansacConfig,
        source: &CoordMatrix,
        reference: &CoordMatrix,
        transform: &mut Transform,
    ) -> Result<(), BoxError>;
}

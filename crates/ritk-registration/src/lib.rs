//! Feature-based registration of 3-D volumes.
//!
//! Keypoints are extracted from a moving (source) and a fixed (reference)
//! image, matched, and a transform is robustly fitted to the matched
//! positions. Each image has its own voxel size, so the fit runs in physical
//! coordinates and the result is converted back to voxel coordinates.
//!
//! Detection, matching and estimation are supplied by the caller through the
//! [`FeatureExtractor`], [`DescriptorMatcher`] and [`RobustEstimator`] traits.

pub mod config;
pub mod coordinates;
pub mod error;
pub mod estimator;
pub mod extract;
pub mod features;
pub mod matcher;
pub mod resample;
pub mod session;
pub mod transform;
pub mod validation;
pub mod warp;

pub use config::{DetectorConfig, RansacConfig, DEFAULT_MATCH_THRESHOLD};
pub use coordinates::{to_physical, to_voxel, to_voxel_points, CoordMatrix, NDIMS};
pub use error::{BoxError, RegistrationError, Result, Side};
pub use estimator::RobustEstimator;
pub use extract::FeatureExtractor;
pub use features::{
    matches_to_coordinates, scale_features, Descriptor, DescriptorStore, Keypoint, KeypointStore, Match,
    MatchList,
};
pub use matcher::DescriptorMatcher;
pub use resample::{Resampler, SpacingResampler};
pub use session::{MatchState, RegistrationSession, SideFeatures};
pub use transform::{Affine, ThinPlateSpline, Transform};
pub use warp::warp_source_to_reference;

//! Error types for feature-based registration.
//!
//! Every fallible operation reports exactly one of these outcomes. Failures
//! of external collaborators (detector, extractor, matcher, estimator,
//! resampler) keep their cause as the error source.

use std::fmt;
use thiserror::Error;

/// Boxed cause returned by collaborator implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which image of the pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The moving image.
    Source,
    /// The fixed image.
    Reference,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Reference => f.write_str("reference"),
        }
    }
}

/// Main error type for registration operations.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Out-of-range parameter or configuration value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Matrix with the wrong number of rows or columns.
    #[error("Invalid shape: expected {expected:?}, got {actual:?}")]
    InvalidShape {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Coordinates that are not finite real numbers.
    #[error("Non-finite value: {0}")]
    NonFinite(String),

    /// Transform variant without a coordinate conversion.
    #[error("Unsupported transform type: {0}")]
    UnsupportedTransform(&'static str),

    /// Empty descriptor store at registration time.
    #[error("No {0} image descriptors are available")]
    NoFeatures(Side),

    /// Matches requested before any registration committed them.
    #[error("No matches are available")]
    NoMatches,

    /// Keypoint detection failed.
    #[error("Failed to detect {side} keypoints")]
    DetectionFailed {
        side: Side,
        #[source]
        source: BoxError,
    },

    /// Descriptor extraction failed.
    #[error("Failed to extract {side} descriptors")]
    ExtractionFailed {
        side: Side,
        #[source]
        source: BoxError,
    },

    /// Descriptor matching failed.
    #[error("Failed to match descriptors")]
    MatchFailed(#[source] BoxError),

    /// A match referenced a descriptor that does not exist.
    #[error("Failed to extract coordinate matrices: {0}")]
    CoordinateExtractionFailed(String),

    /// Robust transform estimation failed.
    #[error("Failed to estimate the transformation")]
    EstimationFailed(#[source] BoxError),

    /// Resampling an input image failed.
    #[error("Failed to resample the {side} image")]
    ResampleFailed {
        side: Side,
        #[source]
        source: BoxError,
    },

    /// A session sub-object could not be initialized.
    #[error("Initialization failed: {0}")]
    FatalInit(String),
}

/// Result type for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

impl RegistrationError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a shape error for a matrix expected to be `expected`.
    pub fn invalid_shape(expected: &[usize], actual: &[usize]) -> Self {
        Self::InvalidShape {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Create a non-finite value error.
    pub fn non_finite(msg: impl Into<String>) -> Self {
        Self::NonFinite(msg.into())
    }

    /// Create a coordinate extraction error.
    pub fn coordinate_extraction(msg: impl Into<String>) -> Self {
        Self::CoordinateExtractionFailed(msg.into())
    }

    /// Create an initialization error.
    pub fn fatal_init(msg: impl Into<String>) -> Self {
        Self::FatalInit(msg.into())
    }
}

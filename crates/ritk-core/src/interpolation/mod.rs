//! Sampling of voxel data at continuous indices.

pub mod trait_;
pub mod linear;
pub mod nearest;

pub use trait_::Interpolator;
pub use linear::LinearInterpolator;
pub use nearest::NearestNeighborInterpolator;

use serde::{Serialize, Deserialize};

/// Interpolation scheme selected at run time, e.g. from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Trilinear interpolation.
    #[default]
    Linear,
    /// Nearest voxel value.
    Nearest,
}

impl std::fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Nearest => f.write_str("nearest"),
        }
    }
}

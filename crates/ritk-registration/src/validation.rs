//! Range checks for parameters, configurations and coordinate data.

use nalgebra::DMatrix;
use ritk_core::spatial::Spacing3;
use crate::config::{DetectorConfig, RansacConfig};
use crate::error::{RegistrationError, Result};

/// Validate a nearest-neighbour matching threshold: `0 < t <= 1`.
pub fn validate_match_threshold(threshold: f64) -> Result<()> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(RegistrationError::invalid_argument(format!(
            "matching threshold must be in (0, 1], got {}",
            threshold
        )));
    }
    Ok(())
}

/// Validate detector parameters.
pub fn validate_detector_config(config: &DetectorConfig) -> Result<()> {
    if !(config.peak_threshold > 0.0 && config.peak_threshold <= 1.0) {
        return Err(RegistrationError::invalid_argument(format!(
            "peak threshold must be in (0, 1], got {}",
            config.peak_threshold
        )));
    }
    if !(0.0..=1.0).contains(&config.corner_threshold) {
        return Err(RegistrationError::invalid_argument(format!(
            "corner threshold must be in [0, 1], got {}",
            config.corner_threshold
        )));
    }
    if config.levels_per_octave == 0 {
        return Err(RegistrationError::invalid_argument("levels per octave must be at least 1"));
    }
    if !(config.sigma_n.is_finite() && config.sigma_n > 0.0) {
        return Err(RegistrationError::invalid_argument(format!(
            "sigma_n must be positive, got {}",
            config.sigma_n
        )));
    }
    if !(config.sigma0.is_finite() && config.sigma0 > 0.0) {
        return Err(RegistrationError::invalid_argument(format!(
            "sigma0 must be positive, got {}",
            config.sigma0
        )));
    }
    if config.num_octaves == Some(0) {
        return Err(RegistrationError::invalid_argument("number of octaves must be at least 1"));
    }
    Ok(())
}

/// Validate RANSAC parameters.
pub fn validate_ransac_config(config: &RansacConfig) -> Result<()> {
    if !(config.error_threshold.is_finite() && config.error_threshold > 0.0) {
        return Err(RegistrationError::invalid_argument(format!(
            "RANSAC error threshold must be positive, got {}",
            config.error_threshold
        )));
    }
    if config.num_iterations == 0 {
        return Err(RegistrationError::invalid_argument("RANSAC needs at least one iteration"));
    }
    Ok(())
}

/// Validate a unit vector (voxel spacing).
pub fn validate_units(units: &Spacing3) -> Result<()> {
    if !units.is_valid() {
        return Err(RegistrationError::invalid_argument(format!(
            "units must be finite and positive, got {:?}",
            units.to_array()
        )));
    }
    Ok(())
}

/// Validate an `[N, cols]` coordinate matrix with finite entries.
pub fn validate_coordinates(points: &DMatrix<f64>, cols: usize) -> Result<()> {
    if points.ncols() != cols {
        return Err(RegistrationError::invalid_shape(
            &[points.nrows(), cols],
            &[points.nrows(), points.ncols()],
        ));
    }
    if let Some((row, _)) = points.row_iter().enumerate().find(|(_, r)| r.iter().any(|v| !v.is_finite())) {
        return Err(RegistrationError::non_finite(format!(
            "coordinate row {} is not finite",
            row
        )));
    }
    Ok(())
}

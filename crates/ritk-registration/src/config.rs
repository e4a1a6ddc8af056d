//! Configuration value types for the detector and the robust estimator.
//!
//! Both are plain values: the session stores its own copy, so callers may
//! modify or drop theirs after handing them over.

use serde::{Serialize, Deserialize};

/// Default nearest-neighbour matching threshold.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

/// Keypoint detector and descriptor extractor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum DoG response, relative to the image maximum, in (0, 1].
    pub peak_threshold: f64,
    /// Minimum corner score in [0, 1].
    pub corner_threshold: f64,
    /// Scale-space levels per octave.
    pub levels_per_octave: usize,
    /// Nominal blur of the input data.
    pub sigma_n: f64,
    /// Blur of the first pyramid level.
    pub sigma0: f64,
    /// Number of octaves; `None` derives it from the image size.
    pub num_octaves: Option<usize>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            peak_threshold: 0.1,
            corner_threshold: 0.4,
            levels_per_octave: 3,
            sigma_n: 1.15,
            sigma0: 1.6,
            num_octaves: None,
        }
    }
}

impl DetectorConfig {
    /// Create a detector config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the peak threshold.
    pub fn with_peak_threshold(mut self, threshold: f64) -> Self {
        self.peak_threshold = threshold;
        self
    }

    /// Set the corner threshold.
    pub fn with_corner_threshold(mut self, threshold: f64) -> Self {
        self.corner_threshold = threshold;
        self
    }

    /// Set the number of levels per octave.
    pub fn with_levels_per_octave(mut self, levels: usize) -> Self {
        self.levels_per_octave = levels;
        self
    }

    /// Set the nominal and base blur.
    pub fn with_sigmas(mut self, sigma_n: f64, sigma0: f64) -> Self {
        self.sigma_n = sigma_n;
        self.sigma0 = sigma0;
        self
    }

    /// Fix the number of octaves.
    pub fn with_num_octaves(mut self, octaves: usize) -> Self {
        self.num_octaves = Some(octaves);
        self
    }
}

/// RANSAC parameters for robust transform estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RansacConfig {
    /// Inlier distance, in physical units (mm).
    pub error_threshold: f64,
    /// Number of random trials.
    pub num_iterations: usize,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            error_threshold: 5.0,
            num_iterations: 500,
        }
    }
}

impl RansacConfig {
    /// Create a RANSAC config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inlier distance.
    pub fn with_error_threshold(mut self, threshold: f64) -> Self {
        self.error_threshold = threshold;
        self
    }

    /// Set the number of trials.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.num_iterations = iterations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let config = DetectorConfig::new()
            .with_peak_threshold(0.2)
            .with_levels_per_octave(4)
            .with_num_octaves(2);
        assert_eq!(config.peak_threshold, 0.2);
        assert_eq!(config.levels_per_octave, 4);
        assert_eq!(config.num_octaves, Some(2));
        assert_eq!(config.corner_threshold, DetectorConfig::default().corner_threshold);

        let ransac = RansacConfig::new().with_error_threshold(2.5).with_iterations(50);
        assert_eq!(ransac, RansacConfig { error_threshold: 2.5, num_iterations: 50 });
    }
}

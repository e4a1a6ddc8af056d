//! Feature-based registration session.
//!
//! A session holds the configuration, the features of the current source and
//! reference images, and the result of the last matching run. Images are
//! registered by extracting features from each, matching them, and robustly
//! fitting a transform to the matched positions in physical space. The fitted
//! transform is returned in voxel space.

use std::marker::PhantomData;
use burn::tensor::backend::Backend;
use ritk_core::spatial::Spacing3;
use ritk_core::{Image, InterpolationMode};
use crate::config::{DetectorConfig, RansacConfig, DEFAULT_MATCH_THRESHOLD};
use crate::coordinates::{to_physical, to_voxel, CoordMatrix};
use crate::error::{RegistrationError, Result, Side};
use crate::estimator::RobustEstimator;
use crate::extract::FeatureExtractor;
use crate::features::{
    matches_to_coordinates, scale_features, DescriptorStore, KeypointStore, Match, MatchList,
};
use crate::matcher::DescriptorMatcher;
use crate::resample::{Resampler, SpacingResampler};
use crate::transform::Transform;
use crate::validation::{
    validate_detector_config, validate_match_threshold, validate_ransac_config, validate_units,
};

/// Everything the session knows about one image of the pair.
#[derive(Debug, Clone, Default)]
pub struct SideFeatures {
    /// Voxel size of the image the features were extracted from.
    pub units: Option<Spacing3>,
    pub keypoints: KeypointStore,
    pub descriptors: DescriptorStore,
}

impl SideFeatures {
    fn clear(&mut self) {
        self.units = None;
        self.keypoints.clear();
        self.descriptors.clear();
    }

    /// Units of a side that has descriptors to match.
    fn ready(&self, side: Side) -> Result<Spacing3> {
        match self.units {
            Some(units) if !self.descriptors.is_empty() => Ok(units),
            _ => Err(RegistrationError::NoFeatures(side)),
        }
    }
}

/// Matches committed by the last successful matching step.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub pairs: MatchList,
    /// `[N, 3]` source voxel coordinates, row-aligned with `pairs`.
    pub source: CoordMatrix,
    /// `[N, 3]` reference voxel coordinates, row-aligned with `pairs`.
    pub reference: CoordMatrix,
}

/// Registration session.
///
/// # Example
/// ```ignore
/// let mut session = RegistrationSession::new(extractor, matcher, estimator)?;
/// session.set_match_threshold(0.7)?;
///
/// let mut transform = Transform::affine();
/// session.register_resampled(&moving, &fixed, InterpolationMode::Linear, Some(&mut transform))?;
/// let (src, refr) = session.matches()?;
/// ```
pub struct RegistrationSession<B, F, M, E, R = SpacingResampler>
where
    B: Backend,
    F: FeatureExtractor<B>,
    M: DescriptorMatcher,
    E: RobustEstimator,
    R: Resampler<B>,
{
    extractor: F,
    matcher: M,
    estimator: E,
    resampler: R,
    detector_config: DetectorConfig,
    ransac_config: RansacConfig,
    match_threshold: f64,
    source: SideFeatures,
    reference: SideFeatures,
    matches: Option<MatchState>,
    _phantom: PhantomData<B>,
}

impl<B, F, M, E> RegistrationSession<B, F, M, E, SpacingResampler>
where
    B: Backend,
    F: FeatureExtractor<B>,
    M: DescriptorMatcher,
    E: RobustEstimator,
{
    /// Create a session with default settings and the default resampler.
    pub fn new(extractor: F, matcher: M, estimator: E) -> Result<Self> {
        Self::with_resampler(extractor, matcher, estimator, SpacingResampler::new())
    }
}

impl<B, F, M, E, R> RegistrationSession<B, F, M, E, R>
where
    B: Backend,
    F: FeatureExtractor<B>,
    M: DescriptorMatcher,
    E: RobustEstimator,
    R: Resampler<B>,
{
    /// Create a session with a custom resampler.
    pub fn with_resampler(extractor: F, matcher: M, estimator: E, resampler: R) -> Result<Self> {
        let (detector_config, ransac_config) = default_configs()?;
        Ok(Self {
            extractor,
            matcher,
            estimator,
            resampler,
            detector_config,
            ransac_config,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            source: SideFeatures::default(),
            reference: SideFeatures::default(),
            matches: None,
            _phantom: PhantomData,
        })
    }

    /// Release all features and matches and restore the default settings.
    pub fn reset(&mut self) -> Result<()> {
        let (detector_config, ransac_config) = default_configs()?;
        self.detector_config = detector_config;
        self.ransac_config = ransac_config;
        self.match_threshold = DEFAULT_MATCH_THRESHOLD;
        self.source.clear();
        self.reference.clear();
        self.matches = None;
        tracing::debug!("Registration session reset");
        Ok(())
    }

    pub fn match_threshold(&self) -> f64 {
        self.match_threshold
    }

    /// Set the nearest-neighbour matching threshold, in (0, 1].
    ///
    /// The previous threshold is kept if `threshold` is out of range.
    pub fn set_match_threshold(&mut self, threshold: f64) -> Result<()> {
        validate_match_threshold(threshold).inspect_err(|e| tracing::error!("{}", e))?;
        self.match_threshold = threshold;
        Ok(())
    }

    pub fn ransac_config(&self) -> &RansacConfig {
        &self.ransac_config
    }

    /// Copy in new estimator parameters.
    pub fn set_estimator_config(&mut self, config: &RansacConfig) -> Result<()> {
        validate_ransac_config(config).inspect_err(|e| tracing::error!("{}", e))?;
        self.ransac_config = config.clone();
        Ok(())
    }

    pub fn detector_config(&self) -> &DetectorConfig {
        &self.detector_config
    }

    /// Copy in new detector parameters.
    pub fn set_detector_config(&mut self, config: &DetectorConfig) -> Result<()> {
        validate_detector_config(config).inspect_err(|e| tracing::error!("{}", e))?;
        self.detector_config = config.clone();
        Ok(())
    }

    pub fn source_features(&self) -> &SideFeatures {
        &self.source
    }

    pub fn reference_features(&self) -> &SideFeatures {
        &self.reference
    }

    /// Extract features from the moving image.
    pub fn set_source(&mut self, image: &Image<B, 3>) -> Result<()> {
        self.set_side(Side::Source, image)
    }

    /// Extract features from the fixed image.
    pub fn set_reference(&mut self, image: &Image<B, 3>) -> Result<()> {
        self.set_side(Side::Reference, image)
    }

    fn set_side(&mut self, side: Side, image: &Image<B, 3>) -> Result<()> {
        let units = *image.spacing();
        validate_units(&units).inspect_err(|e| tracing::error!("{} image: {}", side, e))?;

        let features = match side {
            Side::Source => &mut self.source,
            Side::Reference => &mut self.reference,
        };
        features.clear();
        features.units = Some(units);

        features.keypoints = self
            .extractor
            .detect(image, &self.detector_config)
            .map_err(|source| {
                tracing::error!("Keypoint detection failed for the {} image: {}", side, source);
                RegistrationError::DetectionFailed { side, source }
            })?;

        features.descriptors = self
            .extractor
            .extract(image, &features.keypoints, &self.detector_config)
            .map_err(|source| {
                tracing::error!("Descriptor extraction failed for the {} image: {}", side, source);
                RegistrationError::ExtractionFailed { side, source }
            })?;

        tracing::debug!(
            "{} image: {} keypoints, {} descriptors, units {:?}",
            side,
            features.keypoints.len(),
            features.descriptors.len(),
            units.to_array()
        );
        Ok(())
    }

    /// Match the current features and, if a transform is given, fit it.
    ///
    /// The fitted transform maps reference voxels to source voxels. Without a
    /// transform only the matching step runs. Matches are committed before
    /// estimation, so they stay available even if estimation fails.
    pub fn register(&mut self, transform: Option<&mut Transform>) -> Result<()> {
        let src_units = self.source.ready(Side::Source).inspect_err(|e| tracing::error!("{}", e))?;
        let ref_units = self.reference.ready(Side::Reference).inspect_err(|e| tracing::error!("{}", e))?;

        let pairs = self
            .matcher
            .match_descriptors(&self.source.descriptors, &self.reference.descriptors, self.match_threshold)
            .map_err(|source| {
                tracing::error!("Descriptor matching failed: {}", source);
                RegistrationError::MatchFailed(source)
            })?;
        if pairs.is_empty() {
            tracing::warn!("No descriptor matches at threshold {}", self.match_threshold);
        }

        let (src_voxels, ref_voxels) =
            matches_to_coordinates(&self.source.descriptors, &self.reference.descriptors, &pairs)
                .inspect_err(|e| tracing::error!("{}", e))?;
        let state = self.matches.insert(MatchState {
            pairs,
            source: src_voxels,
            reference: ref_voxels,
        });
        tracing::debug!("Committed {} matches", state.pairs.len());

        let Some(transform) = transform else {
            return Ok(());
        };

        let src_mm = to_physical(&state.source, &src_units)
            .inspect_err(|e| tracing::error!("Source coordinates: {}", e))?;
        let ref_mm = to_physical(&state.reference, &ref_units)
            .inspect_err(|e| tracing::error!("Reference coordinates: {}", e))?;

        self.estimator
            .estimate(&self.ransac_config, &src_mm, &ref_mm, transform)
            .map_err(|source| {
                tracing::error!("Transform estimation failed: {}", source);
                RegistrationError::EstimationFailed(source)
            })?;

        to_voxel(transform, &src_units, &ref_units)
            .inspect_err(|e| tracing::error!("Voxel conversion of the {} transform: {}", transform.name(), e))?;

        tracing::info!(
            "Registered {} transform from {} matches",
            transform.name(),
            state.pairs.len()
        );
        Ok(())
    }

    /// Register two images, resampling them to a common voxel size first.
    ///
    /// Both images are resampled to the per-axis minimum of their voxel
    /// sizes, features are extracted from the resampled images and mapped
    /// back onto each original voxel grid, then [`register`](Self::register)
    /// runs. Images with identical voxel sizes are used as they are.
    pub fn register_resampled(
        &mut self,
        source: &Image<B, 3>,
        reference: &Image<B, 3>,
        interpolation: InterpolationMode,
        transform: Option<&mut Transform>,
    ) -> Result<()> {
        let src_units = *source.spacing();
        let ref_units = *reference.spacing();
        validate_units(&src_units).inspect_err(|e| tracing::error!("source image: {}", e))?;
        validate_units(&ref_units).inspect_err(|e| tracing::error!("reference image: {}", e))?;

        if src_units == ref_units {
            tracing::debug!("Voxel sizes match, registering without resampling");
            self.set_source(source)?;
            self.set_reference(reference)?;
            return self.register(transform);
        }

        let units_min = src_units.finest(&ref_units);
        let src_factors = units_min.component_div(&src_units);
        let ref_factors = units_min.component_div(&ref_units);
        tracing::debug!(
            "Resampling to {:?} ({} interpolation)",
            units_min.to_array(),
            interpolation
        );

        let src_resampled = self
            .resampler
            .resample(source, &units_min, interpolation)
            .map_err(|cause| {
                tracing::error!("Resampling the source image failed: {}", cause);
                RegistrationError::ResampleFailed { side: Side::Source, source: cause }
            })?;
        let ref_resampled = self
            .resampler
            .resample(reference, &units_min, interpolation)
            .map_err(|cause| {
                tracing::error!("Resampling the reference image failed: {}", cause);
                RegistrationError::ResampleFailed { side: Side::Reference, source: cause }
            })?;

        self.set_source(&src_resampled)?;
        self.set_reference(&ref_resampled)?;

        scale_features(
            &src_factors,
            self.source.keypoints.as_mut_slice(),
            self.source.descriptors.as_mut_slice(),
        );
        scale_features(
            &ref_factors,
            self.reference.keypoints.as_mut_slice(),
            self.reference.descriptors.as_mut_slice(),
        );

        self.register(transform)
    }

    /// Copies of the matched source and reference voxel coordinates.
    pub fn matches(&self) -> Result<(CoordMatrix, CoordMatrix)> {
        let state = self
            .matches
            .as_ref()
            .ok_or(RegistrationError::NoMatches)
            .inspect_err(|e| tracing::error!("{}", e))?;
        Ok((state.source.clone(), state.reference.clone()))
    }

    /// Index pairs of the committed matches.
    pub fn match_pairs(&self) -> Option<&[Match]> {
        self.matches.as_ref().map(|state| state.pairs.as_slice())
    }
}

fn default_configs() -> Result<(DetectorConfig, RansacConfig)> {
    let detector = DetectorConfig::default();
    let ransac = RansacConfig::default();
    validate_detector_config(&detector)
        .and_then(|_| validate_ransac_config(&ransac))
        .map_err(|e| {
            tracing::error!("Default configuration rejected: {}", e);
            RegistrationError::fatal_init(e.to_string())
        })?;
    Ok((detector, ransac))
}

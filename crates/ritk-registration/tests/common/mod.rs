//! Simple collaborators and synthetic volumes shared by the integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};
use burn_ndarray::NdArray;
use nalgebra::DMatrix;
use ritk_core::spatial::{Point3, Spacing3};
use ritk_core::{Image, InterpolationMode};
use ritk_registration::{
    Affine, BoxError, CoordMatrix, Descriptor, DescriptorMatcher, DescriptorStore, DetectorConfig,
    FeatureExtractor, Keypoint, KeypointStore, Match, MatchList, RansacConfig, Resampler,
    RobustEstimator, Transform,
};

pub type TestBackend = NdArray<f32>;

/// Log sink that keeps everything written to it.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that records this crate's log lines.
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter("ritk_registration=debug")
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.contents())
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ritk_registration=debug")
        .with_test_writer()
        .try_init();
}

/// Cubic volume of `size` voxels per side with bright single-voxel markers.
///
/// `markers` are `(x, y, z, value)`.
pub fn marker_volume(size: usize, spacing: Spacing3, markers: &[([usize; 3], f32)]) -> Image<TestBackend, 3> {
    let mut values = vec![0.0f32; size * size * size];
    for ([x, y, z], value) in markers {
        values[z * size * size + y * size + x] = *value;
    }
    Image::from_voxels(values, [size, size, size], spacing, &Default::default())
}

/// Non-coplanar marker positions inside an 8^3 grid, with distinct values.
pub fn source_markers() -> Vec<([usize; 3], f32)> {
    vec![
        ([1, 1, 1], 10.0),
        ([5, 1, 2], 20.0),
        ([2, 5, 1], 30.0),
        ([1, 2, 5], 40.0),
        ([5, 5, 5], 50.0),
        ([3, 3, 3], 60.0),
    ]
}

/// Source markers at twice the voxel index plus `shift`.
pub fn doubled_markers(shift: [usize; 3]) -> Vec<([usize; 3], f32)> {
    source_markers()
        .into_iter()
        .map(|([x, y, z], v)| ([2 * x + shift[0], 2 * y + shift[1], 2 * z + shift[2]], v))
        .collect()
}

fn voxels(image: &Image<TestBackend, 3>) -> Result<Vec<f32>, BoxError> {
    image
        .data()
        .clone()
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| format!("unreadable voxel data: {:?}", e).into())
}

/// Detects strict local maxima above `peak_threshold * max`.
///
/// Descriptors carry the voxel value, so markers with distinct values match
/// uniquely across images.
#[derive(Debug, Default)]
pub struct PeakExtractor;

impl FeatureExtractor<TestBackend> for PeakExtractor {
    fn detect(&self, image: &Image<TestBackend, 3>, config: &DetectorConfig) -> Result<KeypointStore, BoxError> {
        let values = voxels(image)?;
        let [nz, ny, nx] = image.shape();
        let max = values.iter().copied().fold(0.0f32, f32::max);
        let threshold = config.peak_threshold as f32 * max;
        let at = |x: usize, y: usize, z: usize| values[z * ny * nx + y * nx + x];

        let mut keypoints = KeypointStore::new();
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let v = at(x, y, z);
                    if v <= threshold {
                        continue;
                    }
                    let mut is_peak = true;
                    for dz in -1i64..=1 {
                        for dy in -1i64..=1 {
                            for dx in -1i64..=1 {
                                if dx == 0 && dy == 0 && dz == 0 {
                                    continue;
                                }
                                let (xx, yy, zz) = (x as i64 + dx, y as i64 + dy, z as i64 + dz);
                                if xx < 0 || yy < 0 || zz < 0 || xx >= nx as i64 || yy >= ny as i64 || zz >= nz as i64 {
                                    continue;
                                }
                                if at(xx as usize, yy as usize, zz as usize) >= v {
                                    is_peak = false;
                                }
                            }
                        }
                    }
                    if is_peak {
                        keypoints.push(Keypoint::new(Point3::new([x as f64, y as f64, z as f64]), config.sigma0));
                    }
                }
            }
        }
        Ok(keypoints)
    }

    fn extract(
        &self,
        image: &Image<TestBackend, 3>,
        keypoints: &KeypointStore,
        _config: &DetectorConfig,
    ) -> Result<DescriptorStore, BoxError> {
        let values = voxels(image)?;
        let [_, ny, nx] = image.shape();
        keypoints
            .iter()
            .map(|kp| -> Result<Descriptor, BoxError> {
                let [x, y, z] = [kp.position[0], kp.position[1], kp.position[2]].map(|c| c.round() as usize);
                let value = values
                    .get(z * ny * nx + y * nx + x)
                    .copied()
                    .ok_or_else(|| BoxError::from("keypoint outside the image"))?;
                Ok(Descriptor::new(kp.position, kp.scale, vec![value]))
            })
            .collect()
    }
}

/// Extractor that fails at a chosen step.
#[derive(Debug, Default)]
pub struct FailingExtractor {
    pub fail_detect: bool,
}

impl FeatureExtractor<TestBackend> for FailingExtractor {
    fn detect(&self, image: &Image<TestBackend, 3>, config: &DetectorConfig) -> Result<KeypointStore, BoxError> {
        if self.fail_detect {
            return Err("scale space could not be built".into());
        }
        PeakExtractor.detect(image, config)
    }

    fn extract(
        &self,
        _image: &Image<TestBackend, 3>,
        _keypoints: &KeypointStore,
        _config: &DetectorConfig,
    ) -> Result<DescriptorStore, BoxError> {
        Err("descriptor window outside the image".into())
    }
}

/// Nearest-neighbour matcher with a distance ratio test.
#[derive(Debug, Default)]
pub struct RatioMatcher;

impl DescriptorMatcher for RatioMatcher {
    fn match_descriptors(
        &self,
        source: &DescriptorStore,
        reference: &DescriptorStore,
        threshold: f64,
    ) -> Result<MatchList, BoxError> {
        let mut matches = MatchList::new();
        for (i, s) in source.iter().enumerate() {
            let mut best: Option<(usize, f64)> = None;
            let mut second = f64::INFINITY;
            for (j, r) in reference.iter().enumerate() {
                let d = s.distance_squared(r).sqrt();
                match best {
                    Some((_, bd)) if d >= bd => second = second.min(d),
                    Some((_, bd)) => {
                        second = bd;
                        best = Some((j, d));
                    }
                    None => best = Some((j, d)),
                }
            }
            if let Some((j, d)) = best {
                if d <= threshold * second {
                    matches.push(Match::new(i, j));
                }
            }
        }
        Ok(matches)
    }
}

/// Matcher that always fails.
#[derive(Debug, Default)]
pub struct FailingMatcher;

impl DescriptorMatcher for FailingMatcher {
    fn match_descriptors(&self, _: &DescriptorStore, _: &DescriptorStore, _: f64) -> Result<MatchList, BoxError> {
        Err("index build failed".into())
    }
}

/// Least-squares affine fit over all correspondences.
#[derive(Debug, Default)]
pub struct LeastSquaresAffine;

impl RobustEstimator for LeastSquaresAffine {
    fn estimate(
        &self,
        config: &RansacConfig,
        source: &CoordMatrix,
        reference: &CoordMatrix,
        transform: &mut Transform,
    ) -> Result<(), BoxError> {
        let Transform::Affine(affine) = transform else {
            return Err("only affine models are supported".into());
        };
        let n = reference.nrows();
        if n < 4 || config.num_iterations == 0 {
            return Err(format!("need at least 4 correspondences, got {}", n).into());
        }

        // [ref | 1] P = src, with P = [A | t]^T
        let mut design = DMatrix::<f64>::from_element(n, 4, 1.0);
        design.view_mut((0, 0), (n, 3)).copy_from(reference);
        let params = design.svd(true, true).solve(source, 1e-12)?;
        *affine = Affine::new(params.transpose())?;
        Ok(())
    }
}

/// Estimator that rejects every sample.
#[derive(Debug, Default)]
pub struct FailingEstimator;

impl RobustEstimator for FailingEstimator {
    fn estimate(&self, _: &RansacConfig, _: &CoordMatrix, _: &CoordMatrix, _: &mut Transform) -> Result<(), BoxError> {
        Err("no consensus set".into())
    }
}

/// Estimator that leaves the transform as it is.
#[derive(Debug, Default)]
pub struct KeepEstimator;

impl RobustEstimator for KeepEstimator {
    fn estimate(&self, _: &RansacConfig, _: &CoordMatrix, _: &CoordMatrix, _: &mut Transform) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Resampler that always fails.
#[derive(Debug, Default)]
pub struct FailingResampler;

impl Resampler<TestBackend> for FailingResampler {
    fn resample(
        &self,
        _: &Image<TestBackend, 3>,
        _: &Spacing3,
        _: InterpolationMode,
    ) -> Result<Image<TestBackend, 3>, BoxError> {
        Err("out of memory".into())
    }
}

/// Largest absolute difference between two matrices of the same shape.
pub fn max_abs_diff(a: &DMatrix<f64>, b: &DMatrix<f64>) -> f64 {
    assert_eq!(a.shape(), b.shape());
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
}

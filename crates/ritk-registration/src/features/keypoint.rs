//! Scale-space keypoints.

use nalgebra::Matrix3;
use ritk_core::spatial::Point3;

/// A detected keypoint in voxel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Keypoint {
    /// Sub-voxel position (x, y, z).
    pub position: Point3,
    /// Characteristic scale.
    pub scale: f64,
    /// Local orientation frame.
    pub orientation: Matrix3<f64>,
}

impl Keypoint {
    /// Create a keypoint with an axis-aligned orientation.
    pub fn new(position: Point3, scale: f64) -> Self {
        Self {
            position,
            scale,
            orientation: Matrix3::identity(),
        }
    }

    /// Set the orientation frame.
    pub fn with_orientation(mut self, orientation: Matrix3<f64>) -> Self {
        self.orientation = orientation;
        self
    }
}

/// Ordered collection of keypoints detected in one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeypointStore {
    keypoints: Vec<Keypoint>,
}

impl KeypointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keypoints: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, keypoint: Keypoint) {
        self.keypoints.push(keypoint);
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Keypoint> {
        self.keypoints.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keypoint> {
        self.keypoints.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Keypoint> {
        self.keypoints.iter_mut()
    }

    pub fn clear(&mut self) {
        self.keypoints.clear();
    }

    pub fn as_slice(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn as_mut_slice(&mut self) -> &mut [Keypoint] {
        &mut self.keypoints
    }
}

impl From<Vec<Keypoint>> for KeypointStore {
    fn from(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }
}

impl FromIterator<Keypoint> for KeypointStore {
    fn from_iter<I: IntoIterator<Item = Keypoint>>(iter: I) -> Self {
        Self {
            keypoints: iter.into_iter().collect(),
        }
    }
}

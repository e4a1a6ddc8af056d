//! Feature descriptors attached to keypoint locations.

use ritk_core::spatial::Point3;

/// A descriptor vector sampled around a keypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Voxel position (x, y, z) of the keypoint it describes.
    pub position: Point3,
    /// Scale of that keypoint.
    pub scale: f64,
    /// Feature vector. Never touched by coordinate rescaling.
    pub features: Vec<f32>,
}

impl Descriptor {
    pub fn new(position: Point3, scale: f64, features: Vec<f32>) -> Self {
        Self {
            position,
            scale,
            features,
        }
    }

    /// Length of the feature vector.
    pub fn size(&self) -> usize {
        self.features.len()
    }

    /// Squared Euclidean distance between feature vectors.
    ///
    /// Both descriptors must come from the same extractor, so their feature
    /// vectors have equal length.
    pub fn distance_squared(&self, other: &Descriptor) -> f64 {
        debug_assert_eq!(
            self.features.len(),
            other.features.len(),
            "descriptor lengths differ"
        );
        self.features
            .iter()
            .zip(other.features.iter())
            .map(|(a, b)| {
                let d = (*a - *b) as f64;
                d * d
            })
            .sum()
    }
}

/// Ordered collection of descriptors extracted from one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorStore {
    descriptors: Vec<Descriptor>,
}

impl DescriptorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            descriptors: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, descriptor: Descriptor) {
        self.descriptors.push(descriptor);
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Descriptor> {
        self.descriptors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Descriptor> {
        self.descriptors.iter_mut()
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }

    pub fn as_slice(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn as_mut_slice(&mut self) -> &mut [Descriptor] {
        &mut self.descriptors
    }
}

impl From<Vec<Descriptor>> for DescriptorStore {
    fn from(descriptors: Vec<Descriptor>) -> Self {
        Self { descriptors }
    }
}

impl FromIterator<Descriptor> for DescriptorStore {
    fn from_iter<I: IntoIterator<Item = Descriptor>>(iter: I) -> Self {
        Self {
            descriptors: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Descriptor::new(Point3::origin(), 1.0, vec![1.0, 2.0, 3.0]);
        let b = Descriptor::new(Point3::origin(), 1.0, vec![1.0, 0.0, 1.0]);
        assert!((a.distance_squared(&b) - 8.0).abs() < 1e-12);
        assert_eq!(a.distance_squared(&a), 0.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "descriptor lengths differ")]
    fn test_distance_requires_equal_lengths() {
        let a = Descriptor::new(Point3::origin(), 1.0, vec![1.0, 2.0, 3.0]);
        let b = Descriptor::new(Point3::origin(), 1.0, vec![1.0]);
        a.distance_squared(&b);
    }

    #[test]
    fn test_store_collects() {
        let store: DescriptorStore = (0..4)
            .map(|i| Descriptor::new(Point3::new([i as f64, 0.0, 0.0]), 1.0, vec![i as f32]))
            .collect();
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(2).map(|d| d.features[0]), Some(2.0));
        assert!(store.get(4).is_none());
    }
}

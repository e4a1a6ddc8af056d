//! Descriptor matching.

use crate::error::BoxError;
use crate::features::{DescriptorStore, MatchList};

/// Nearest-neighbour descriptor matcher.
pub trait DescriptorMatcher {
    /// Pair source descriptors with reference descriptors.
    ///
    /// `threshold` is the nearest-neighbour ratio in (0, 1]; lower values
    /// keep fewer, more distinctive matches.
    fn match_descriptors(
        &self,
        source: &DescriptorStore,
        reference: &DescriptorStore,
        threshold: f64,
    ) -> Result<MatchList, BoxError>;
}

//! Descriptor correspondences and their coordinate matrices.

use crate::coordinates::{CoordMatrix, NDIMS};
use crate::error::{RegistrationError, Result};
use super::descriptor::DescriptorStore;

/// A correspondence between a source and a reference descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    /// Index into the source descriptor store.
    pub source: usize,
    /// Index into the reference descriptor store.
    pub reference: usize,
}

impl Match {
    pub fn new(source: usize, reference: usize) -> Self {
        Self { source, reference }
    }
}

/// Matches produced by one matching run.
pub type MatchList = Vec<Match>;

/// Build aligned `[N, 3]` voxel coordinate matrices from a match list.
///
/// Row `k` of both matrices holds the positions of the two descriptors
/// paired by `matches[k]`.
pub fn matches_to_coordinates(
    source: &DescriptorStore,
    reference: &DescriptorStore,
    matches: &[Match],
) -> Result<(CoordMatrix, CoordMatrix)> {
    let mut src = CoordMatrix::zeros(matches.len(), NDIMS);
    let mut refr = CoordMatrix::zeros(matches.len(), NDIMS);

    for (row, m) in matches.iter().enumerate() {
        let s = source.get(m.source).ok_or_else(|| {
            RegistrationError::coordinate_extraction(format!(
                "match {} refers to source descriptor {} of {}",
                row,
                m.source,
                source.len()
            ))
        })?;
        let r = reference.get(m.reference).ok_or_else(|| {
            RegistrationError::coordinate_extraction(format!(
                "match {} refers to reference descriptor {} of {}",
                row,
                m.reference,
                reference.len()
            ))
        })?;

        for axis in 0..NDIMS {
            src[(row, axis)] = s.position[axis];
            refr[(row, axis)] = r.position[axis];
        }
    }

    Ok((src, refr))
}

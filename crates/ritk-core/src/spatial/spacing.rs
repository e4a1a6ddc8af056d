//! Physical voxel size along each axis.
//!
//! Spacing is what registration code calls an image's "units": the physical
//! extent (usually millimetres) of one voxel along x, y and z.

use super::Vector;

/// Physical distance between adjacent voxels along each axis.
pub type Spacing<const D: usize> = Vector<D>;

impl<const D: usize> Spacing<D> {
    /// Same spacing on every axis.
    pub fn uniform(value: f64) -> Self {
        Vector::repeat(value)
    }

    /// Whether every component is a finite, strictly positive length.
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|s| s.is_finite() && *s > 0.0)
    }

    /// Per-axis minimum of two spacings, i.e. the finer resolution on each axis.
    pub fn finest(&self, other: &Self) -> Self {
        Self(self.0.zip_map(&other.0, f64::min))
    }

    /// Reciprocal of each component.
    pub fn recip(&self) -> Self {
        Self(self.0.map(|s| 1.0 / s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Spacing3 = Spacing<3>;

    #[test]
    fn test_finest() {
        let a = Spacing3::new([1.0, 2.0, 0.5]);
        let b = Spacing3::new([0.8, 3.0, 0.5]);
        assert_eq!(a.finest(&b), Spacing3::new([0.8, 2.0, 0.5]));
    }

    #[test]
    fn test_validity() {
        assert!(Spacing3::uniform(1.0).is_valid());
        assert!(!Spacing3::new([1.0, 0.0, 1.0]).is_valid());
        assert!(!Spacing3::new([1.0, -2.0, 1.0]).is_valid());
        assert!(!Spacing3::new([1.0, f64::NAN, 1.0]).is_valid());
    }

    #[test]
    fn test_recip() {
        let s = Spacing3::new([2.0, 4.0, 0.5]);
        assert_eq!(s.recip(), Spacing3::new([0.5, 0.25, 2.0]));
    }
}

//! Conversions between voxel and physical (millimetre) coordinates.
//!
//! Voxel coordinates become physical ones by multiplying each axis by the
//! image's voxel size. Point lists are `[N, 3]` matrices with columns in
//! x, y, z order. All point conversions return fresh matrices.

use nalgebra::DMatrix;
use ritk_core::spatial::Spacing3;
use crate::error::{RegistrationError, Result};
use crate::transform::{Affine, Transform};
use crate::validation::{validate_coordinates, validate_units};

/// Dense `[N, 3]` coordinate matrix.
pub type CoordMatrix = DMatrix<f64>;

/// Spatial dimensionality of the pipeline.
pub const NDIMS: usize = 3;

/// Convert voxel coordinates to physical coordinates.
pub fn to_physical(points: &CoordMatrix, units: &Spacing3) -> Result<CoordMatrix> {
    scale_columns(points, units, |value, unit| value * unit)
}

/// Convert physical coordinates to voxel coordinates.
pub fn to_voxel_points(points: &CoordMatrix, units: &Spacing3) -> Result<CoordMatrix> {
    scale_columns(points, units, |value, unit| value / unit)
}

fn scale_columns(points: &CoordMatrix, units: &Spacing3, op: impl Fn(f64, f64) -> f64) -> Result<CoordMatrix> {
    validate_coordinates(points, NDIMS)?;
    validate_units(units)?;

    let mut out = points.clone();
    for (j, mut column) in out.column_iter_mut().enumerate() {
        let unit = units[j];
        column.apply(|v| *v = op(*v, unit));
    }
    Ok(out)
}

/// Convert a transform estimated in physical space to voxel space, in place.
///
/// The transform maps reference coordinates to source coordinates, so its
/// inputs are rescaled with `ref_units` and its outputs with `src_units`.
pub fn to_voxel(transform: &mut Transform, src_units: &Spacing3, ref_units: &Spacing3) -> Result<()> {
    validate_units(src_units)?;
    validate_units(ref_units)?;

    match transform {
        Transform::Affine(affine) => affine_to_voxel(affine, src_units, ref_units),
        other => Err(RegistrationError::UnsupportedTransform(other.name())),
    }
}

fn affine_to_voxel(affine: &mut Affine, src_units: &Spacing3, ref_units: &Spacing3) -> Result<()> {
    let (rows, cols) = affine.matrix.shape();
    if rows != NDIMS {
        return Err(RegistrationError::invalid_shape(&[NDIMS, cols], &[rows, cols]));
    }

    for i in 0..rows {
        for j in 0..cols {
            let entry = &mut affine.matrix[(i, j)];
            if j < NDIMS {
                *entry *= ref_units[j];
            }
            *entry /= src_units[i];
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix3, Vector3};
    use crate::transform::ThinPlateSpline;

    #[test]
    fn test_to_physical_scales_columns() {
        let points = CoordMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, -1.0, 0.0, 4.0]);
        let units = Spacing3::new([0.5, 2.0, 3.0]);

        let mm = to_physical(&points, &units).unwrap();
        let expected = [0.5, 4.0, 9.0, -0.5, 0.0, 12.0];
        for (k, e) in expected.iter().enumerate() {
            assert!((mm[(k / 3, k % 3)] - e).abs() < 1e-12);
        }
        // Input is untouched.
        assert_eq!(points[(0, 1)], 2.0);

        let back = to_voxel_points(&mm, &units).unwrap();
        assert!((back - points).abs().max() < 1e-12);
    }

    #[test]
    fn test_empty_point_list() {
        let points = CoordMatrix::zeros(0, 3);
        let mm = to_physical(&points, &Spacing3::uniform(2.0)).unwrap();
        assert_eq!(mm.shape(), (0, 3));
    }

    #[test]
    fn test_point_validation() {
        let units = Spacing3::uniform(1.0);
        assert!(matches!(
            to_physical(&CoordMatrix::zeros(4, 2), &units),
            Err(RegistrationError::InvalidShape { .. })
        ));
        let inf = CoordMatrix::from_row_slice(1, 3, &[0.0, f64::INFINITY, 0.0]);
        assert!(matches!(to_physical(&inf, &units), Err(RegistrationError::NonFinite(_))));
        assert!(matches!(
            to_physical(&CoordMatrix::zeros(1, 3), &Spacing3::new([1.0, 0.0, 1.0])),
            Err(RegistrationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_affine_to_voxel_entries() {
        let mut transform = Transform::Affine(Affine::new(CoordMatrix::from_element(3, 4, 1.0)).unwrap());
        let src_units = Spacing3::new([1.0, 2.0, 4.0]);
        let ref_units = Spacing3::new([3.0, 5.0, 7.0]);

        to_voxel(&mut transform, &src_units, &ref_units).unwrap();
        let m = &transform.as_affine().unwrap().matrix;
        for i in 0..3 {
            for j in 0..4 {
                let scale = if j < 3 { ref_units[j] } else { 1.0 };
                let expected = scale / src_units[i];
                assert!((m[(i, j)] - expected).abs() < 1e-12, "entry ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn test_to_voxel_matches_voxel_space_mapping() {
        // Physical affine: p_src = L p_ref + t.
        let linear = Matrix3::new(0.9, 0.1, 0.0, -0.1, 1.1, 0.2, 0.0, 0.05, 0.95);
        let translation = Vector3::new(3.0, -2.0, 1.5);
        let src_units = Spacing3::new([0.8, 1.0, 2.5]);
        let ref_units = Spacing3::new([1.2, 0.6, 3.0]);

        let mut transform = Transform::Affine(Affine::from_parts(&linear, &translation));
        to_voxel(&mut transform, &src_units, &ref_units).unwrap();
        let voxel = transform.as_affine().unwrap().clone();

        let ref_voxels = CoordMatrix::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 10.0, -4.0, 0.5, 0.0, 0.0, 0.0]);
        let ref_mm = to_physical(&ref_voxels, &ref_units).unwrap();
        let src_mm = Affine::from_parts(&linear, &translation).apply_points(&ref_mm).unwrap();
        let expected = to_voxel_points(&src_mm, &src_units).unwrap();

        let actual = voxel.apply_points(&ref_voxels).unwrap();
        assert!((actual - expected).abs().max() < 1e-10);
    }

    #[test]
    fn test_to_voxel_rejects_wrong_rows() {
        let mut transform = Transform::Affine(Affine { matrix: CoordMatrix::zeros(2, 4) });
        let units = Spacing3::uniform(1.0);
        assert!(matches!(
            to_voxel(&mut transform, &units, &units),
            Err(RegistrationError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_to_voxel_unsupported_variant() {
        let tps = ThinPlateSpline::new(CoordMatrix::zeros(1, 3), CoordMatrix::zeros(1, 3), Affine::identity()).unwrap();
        let mut transform = Transform::ThinPlateSpline(tps.clone());
        let units = Spacing3::uniform(2.0);

        let err = to_voxel(&mut transform, &units, &units).unwrap_err();
        assert!(matches!(err, RegistrationError::UnsupportedTransform("thin-plate spline")));
        assert_eq!(transform, Transform::ThinPlateSpline(tps));
    }
}

//! Transforms estimated by the registration pipeline.
//!
//! A registration transform takes reference coordinates as input and
//! produces source coordinates, in whichever frame (voxel or physical) the
//! estimation ran in.

use nalgebra::{DMatrix, Matrix3, Vector3};
use serde::{Serialize, Deserialize};
use crate::coordinates::{CoordMatrix, NDIMS};
use crate::error::{RegistrationError, Result};
use crate::validation::validate_coordinates;

/// Closed family of transforms the pipeline can estimate into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transform {
    Affine(Affine),
    ThinPlateSpline(ThinPlateSpline),
}

impl Transform {
    /// Identity affine transform.
    pub fn affine() -> Self {
        Transform::Affine(Affine::identity())
    }

    /// Short name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Affine(_) => "affine",
            Transform::ThinPlateSpline(_) => "thin-plate spline",
        }
    }

    pub fn as_affine(&self) -> Option<&Affine> {
        match self {
            Transform::Affine(affine) => Some(affine),
            _ => None,
        }
    }
}

impl From<Affine> for Transform {
    fn from(affine: Affine) -> Self {
        Transform::Affine(affine)
    }
}

/// Affine transform `y = A x + t` stored as a `3 x 4` matrix `[A | t]`.
///
/// Rows index the output dimension; the last column is the translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub matrix: DMatrix<f64>,
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine {
    /// Wrap a parameter matrix. It must be `3 x 4`.
    pub fn new(matrix: DMatrix<f64>) -> Result<Self> {
        let affine = Self { matrix };
        affine.check_shape()?;
        Ok(affine)
    }

    /// Fail unless the parameter matrix is `3 x 4`.
    ///
    /// `matrix` is public so estimators can write it in place; anything that
    /// reads it as `[A | t]` calls this first.
    pub fn check_shape(&self) -> Result<()> {
        if self.matrix.shape() != (NDIMS, NDIMS + 1) {
            return Err(RegistrationError::invalid_shape(
                &[NDIMS, NDIMS + 1],
                &[self.matrix.nrows(), self.matrix.ncols()],
            ));
        }
        Ok(())
    }

    pub fn identity() -> Self {
        Self::from_parts(&Matrix3::identity(), &Vector3::zeros())
    }

    /// Build from the linear part and translation.
    pub fn from_parts(linear: &Matrix3<f64>, translation: &Vector3<f64>) -> Self {
        let mut matrix = DMatrix::zeros(NDIMS, NDIMS + 1);
        matrix.view_mut((0, 0), (NDIMS, NDIMS)).copy_from(linear);
        matrix.view_mut((0, NDIMS), (NDIMS, 1)).copy_from(translation);
        Self { matrix }
    }

    /// Linear part `A`.
    ///
    /// # Panics
    /// If the matrix is smaller than `3 x 3`; see [`Affine::check_shape`].
    pub fn linear(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Translation `t`.
    ///
    /// # Panics
    /// If the matrix is smaller than `3 x 4`; see [`Affine::check_shape`].
    pub fn translation(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, NDIMS).into_owned()
    }

    /// Apply to every row of an `[N, 3]` coordinate matrix.
    pub fn apply_points(&self, points: &CoordMatrix) -> Result<CoordMatrix> {
        self.check_shape()?;
        validate_coordinates(points, NDIMS)?;

        let mut out = CoordMatrix::zeros(points.nrows(), NDIMS);
        for k in 0..points.nrows() {
            for i in 0..NDIMS {
                let mut value = self.matrix[(i, NDIMS)];
                for j in 0..NDIMS {
                    value += self.matrix[(i, j)] * points[(k, j)];
                }
                out[(k, i)] = value;
            }
        }
        Ok(out)
    }
}

/// Thin-plate spline warp defined by control points and weights.
///
/// Estimation may produce this variant, but it has no voxel-space
/// conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinPlateSpline {
    /// `[K, 3]` control points in the input frame.
    pub control_points: DMatrix<f64>,
    /// `[K, 3]` radial basis weights.
    pub weights: DMatrix<f64>,
    /// Polynomial part.
    pub affine: Affine,
}

impl ThinPlateSpline {
    pub fn new(control_points: DMatrix<f64>, weights: DMatrix<f64>, affine: Affine) -> Result<Self> {
        validate_coordinates(&control_points, NDIMS)?;
        if weights.shape() != control_points.shape() {
            return Err(RegistrationError::invalid_shape(
                &[control_points.nrows(), NDIMS],
                &[weights.nrows(), weights.ncols()],
            ));
        }
        Ok(Self {
            control_points,
            weights,
            affine,
        })
    }
}

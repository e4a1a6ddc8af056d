//! Physical-space transforms used when resampling.

pub mod trait_;
pub mod affine;

pub use trait_::Transform;
pub use affine::AffineTransform;

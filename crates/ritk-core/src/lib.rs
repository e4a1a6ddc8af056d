//! Core volumetric image types for ritk.
//!
//! Images carry their voxel data as a burn tensor together with the
//! physical metadata (origin, spacing, direction) needed to move between
//! voxel indices and physical coordinates.

pub mod image;
pub mod spatial;
pub mod transform;
pub mod interpolation;
pub mod filter;

pub use image::Image;
pub use spatial::{Point, Vector, Spacing, Direction};
pub use interpolation::InterpolationMode;

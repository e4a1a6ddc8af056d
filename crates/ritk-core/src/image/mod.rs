//! Image type and voxel grid helpers.

pub mod image;
pub mod grid;

pub use image::Image;
pub use grid::voxel_grid;

pub mod resample;

pub use resample::{ResampleImageFilter, resample_to_spacing, resampled_size};

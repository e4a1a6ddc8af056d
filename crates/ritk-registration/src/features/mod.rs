//! Keypoints, descriptors and matches shared by the registration pipeline.

pub mod keypoint;
pub mod descriptor;
pub mod matches;
pub mod scale;

pub use keypoint::{Keypoint, KeypointStore};
pub use descriptor::{Descriptor, DescriptorStore};
pub use matches::{Match, MatchList, matches_to_coordinates};
pub use scale::scale_features;

//! Circular image cropper used for avatars.

mod component;
pub mod geometry;

pub use component::{CropError, ImageCropper};
pub use geometry::{CropState, Point, Rect};

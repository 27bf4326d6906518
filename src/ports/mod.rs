//! Port traits defining external boundaries.
//!
//! Implementations live in `src/adapters/`.

pub mod image_generator;

pub use image_generator::{GeneratedImage, ImageGenerator, ImageRequest, PORTRAIT_ASPECT_RATIO};

//! Adapter implementations of the image generator port.
//!
//! - `live/`: the real Imagen REST call
//! - `recording`: wraps a live adapter and writes a cassette
//! - `replaying`: answers from a cassette with no network

pub mod live;
pub mod recording;
pub mod replaying;

/// Port name under which generator calls are stored in cassettes.
pub(crate) const PORT: &str = "image_generator";
/// Method name under which generator calls are stored in cassettes.
pub(crate) const METHOD: &str = "generate";

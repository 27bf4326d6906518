//! Image generation service port.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// Aspect ratio requested for every image (portrait, for phone screens).
pub const PORTRAIT_ASPECT_RATIO: &str = "9:16";

/// A fully specified request to the image service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// The resolved model identifier (e.g., `"imagen-3.0-generate-002"`).
    pub model: String,
    /// Style fragment, scene description and optional quality suffix.
    pub prompt: String,
    /// Session seed; `None` when seeds are not sent.
    #[serde(default)]
    pub seed: Option<u32>,
    /// Aspect ratio, always [`PORTRAIT_ASPECT_RATIO`].
    pub aspect_ratio: String,
    /// Number of images to generate, always 1.
    pub number_of_images: u32,
}

/// A single generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Raw image bytes (decoded from base64).
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type of the image (e.g., `"image/png"`).
    pub mime_type: String,
}

/// Images returned by the service, in order. May be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageResponse {
    /// The generated images.
    pub images: Vec<GeneratedImage>,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ImageResponse, ImageError>> + Send + 'a>>;

/// Generates images from text prompts via an external API.
pub trait ImageGenerator: Send + Sync {
    /// Generate images for the given request.
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

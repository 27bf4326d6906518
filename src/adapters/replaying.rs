//! Replaying adapter: answers generator calls from a cassette.

use std::sync::{Arc, Mutex};

use super::{METHOD, PORT};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::ImageError;
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest, ImageResponse};

/// Serves recorded image generation results from a cassette.
pub struct ReplayingImageGenerator {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageGenerator {
    /// Create a replaying generator backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }

    fn next_output(&self) -> Result<serde_json::Value, ImageError> {
        let mut guard = self
            .replayer
            .lock()
            .map_err(|e| ImageError::Config(format!("replayer lock poisoned: {e}")))?;
        let interaction = guard.next_interaction(PORT, METHOD).map_err(ImageError::Config)?;
        tracing::debug!(seq = interaction.seq, replayed = guard.replayed(), "replaying interaction");
        Ok(interaction.output)
    }
}

impl ImageGenerator for ReplayingImageGenerator {
    fn generate(&self, _request: &ImageRequest) -> GenerateFuture<'_> {
        let output = self.next_output();
        Box::pin(async move { replay_result(output?) })
    }
}

/// Turn a recorded `{"Ok": ...}` / `{"Err": "..."}` value back into a result.
///
/// Recorded errors come back as [`ImageError::Api`] with status 0; the
/// message keeps the original status text.
fn replay_result(output: serde_json::Value) -> Result<ImageResponse, ImageError> {
    if let Some(err) = output.get("Err").or_else(|| output.get("err")) {
        let message = err.as_str().unwrap_or("replayed error").to_string();
        return Err(ImageError::Api { status: 0, message });
    }
    let ok = output.get("Ok").or_else(|| output.get("ok")).cloned().unwrap_or(output);
    serde_json::from_value(ok)
        .map_err(|e| ImageError::Config(format!("Malformed cassette output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_output_decodes_images() {
        let response = replay_result(json!({
            "Ok": { "images": [{ "data": "AQI=", "mime_type": "image/png" }] }
        }))
        .unwrap();
        assert_eq!(response.images[0].data, vec![1, 2]);
    }

    #[test]
    fn err_output_keeps_message() {
        match replay_result(json!({ "Err": "API error (403): billing" })) {
            Err(ImageError::Api { status, message }) => {
                assert_eq!(status, 0);
                assert_eq!(message, "API error (403): billing");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_output_is_config_error() {
        assert!(matches!(
            replay_result(json!({ "Ok": { "images": "nope" } })),
            Err(ImageError::Config(_))
        ));
    }
}

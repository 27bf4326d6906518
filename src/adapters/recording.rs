//! Recording adapter: delegates to an inner generator and logs each call.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{METHOD, PORT};
use crate::cassette::recorder::CassetteRecorder;
use crate::error::ImageError;
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest, ImageResponse};

/// Records image generation interactions while delegating to an inner implementation.
pub struct RecordingImageGenerator {
    inner: Box<dyn ImageGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageGenerator {
    /// Wrap `inner`, appending every call to `recorder`.
    pub fn new(inner: Box<dyn ImageGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageGenerator for RecordingImageGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.generate(&request).await;
            if let Err(e) = record(&self.recorder, &request, &result) {
                tracing::warn!(error = %e, "failed to record interaction");
            }
            result
        })
    }
}

/// Store one call using the `{"Ok": ...}` / `{"Err": "..."}` convention.
fn record(
    recorder: &Mutex<CassetteRecorder>,
    request: &ImageRequest,
    result: &Result<ImageResponse, ImageError>,
) -> Result<(), String> {
    let input = serde_json::to_value(request).map_err(|e| e.to_string())?;
    let output = match result {
        Ok(response) => {
            let images = serde_json::to_value(response).map_err(|e| e.to_string())?;
            json!({ "Ok": images })
        }
        Err(e) => json!({ "Err": e.to_string() }),
    };
    let mut guard = recorder.lock().map_err(|e| format!("recorder lock poisoned: {e}"))?;
    guard.record(PORT, METHOD, input, output);
    Ok(())
}

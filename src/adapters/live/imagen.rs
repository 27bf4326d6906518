//! Live adapter for the Imagen `:predict` REST endpoint.

use base64::Engine;
use reqwest::Client;
use serde::Deserialize;

use crate::error::ImageError;
use crate::ports::image_generator::{
    GenerateFuture, GeneratedImage, ImageGenerator, ImageRequest, ImageResponse,
};

/// Live Imagen generator that calls the Google AI API.
pub struct ImagenGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ImagenGenerator {
    /// Create a new Imagen generator with the given API key and base URL.
    #[must_use]
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: Client::new(), api_key, base_url }
    }
}

/// JSON body for a `:predict` call.
fn predict_body(request: &ImageRequest) -> serde_json::Value {
    let mut parameters = serde_json::json!({
        "sampleCount": request.number_of_images,
        "aspectRatio": request.aspect_ratio,
    });

    // the service rejects seeds while watermarking is on
    if let Some(seed) = request.seed {
        parameters["seed"] = seed.into();
        parameters["addWatermark"] = false.into();
    }

    serde_json::json!({
        "instances": [{ "prompt": request.prompt }],
        "parameters": parameters,
    })
}

impl ImageGenerator for ImagenGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = format!("{}/{}:predict", self.base_url, request.model);
            let body = predict_body(&request);

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(ImageError::Api { status: status.as_u16(), message: response_text });
            }

            let parsed: PredictResponse = serde_json::from_str(&response_text).map_err(|e| {
                ImageError::Api { status: 200, message: format!("Failed to parse response: {e}") }
            })?;

            let mut images = Vec::new();
            for prediction in parsed.predictions {
                let Some(encoded) = prediction.bytes_base64_encoded else {
                    if let Some(reason) = prediction.rai_filtered_reason {
                        tracing::warn!(%reason, "prediction filtered");
                    }
                    continue;
                };
                let data = base64::engine::general_purpose::STANDARD.decode(&encoded).map_err(
                    |e| ImageError::Api { status: 200, message: format!("Failed to decode base64: {e}") },
                )?;
                images.push(GeneratedImage {
                    data,
                    mime_type: prediction.mime_type.unwrap_or_else(|| "image/png".to_string()),
                });
            }

            Ok(ImageResponse { images })
        })
    }
}

// --- Imagen API response types ---

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
    rai_filtered_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn request(seed: Option<u32>) -> ImageRequest {
        ImageRequest {
            model: "imagen-3.0-generate-002".into(),
            prompt: "Anime style, a fox".into(),
            seed,
            aspect_ratio: "9:16".into(),
            number_of_images: 1,
        }
    }

    #[test]
    fn body_with_seed_disables_watermark() {
        let body = predict_body(&request(Some(12)));
        assert_eq!(body["instances"][0]["prompt"], "Anime style, a fox");
        assert_eq!(body["parameters"]["sampleCount"], 1);
        assert_eq!(body["parameters"]["aspectRatio"], "9:16");
        assert_eq!(body["parameters"]["seed"], 12);
        assert_eq!(body["parameters"]["addWatermark"], false);
    }

    #[test]
    fn body_without_seed() {
        let body = predict_body(&request(None));
        assert!(body["parameters"].get("seed").is_none());
        assert!(body["parameters"].get("addWatermark").is_none());
    }

    #[tokio::test]
    async fn decodes_predictions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/imagen-3.0-generate-002:predict"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "parameters": { "seed": 77, "aspectRatio": "9:16" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "predictions": [{ "bytesBase64Encoded": "AQID", "mimeType": "image/png" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator =
            ImagenGenerator::new("test-key".into(), format!("{}/v1beta/models/", server.uri()));
        let response = generator.generate(&request(Some(77))).await.unwrap();
        assert_eq!(response.images.len(), 1);
        assert_eq!(response.images[0].data, vec![1, 2, 3]);
        assert_eq!(response.images[0].mime_type, "image/png");
    }

    #[tokio::test]
    async fn forbidden_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string(
                r#"{"error":{"code":403,"message":"billing required","status":"PERMISSION_DENIED"}}"#,
            ))
            .mount(&server)
            .await;

        let generator = ImagenGenerator::new("k".into(), server.uri());
        match generator.generate(&request(Some(1))).await {
            Err(ImageError::Api { status, message }) => {
                assert_eq!(status, 403);
                assert!(message.contains("billing required"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_predictions_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let generator = ImagenGenerator::new("k".into(), server.uri());
        let response = generator.generate(&request(None)).await.unwrap();
        assert!(response.images.is_empty());
    }

    #[tokio::test]
    async fn filtered_prediction_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "predictions": [{ "raiFilteredReason": "blocked" }]
            })))
            .mount(&server)
            .await;

        let generator = ImagenGenerator::new("k".into(), server.uri());
        let response = generator.generate(&request(None)).await.unwrap();
        assert!(response.images.is_empty());
    }
}

//! Turns (style, scene, seed) into an image request and runs it.

use crate::error::GenerationError;
use crate::ports::{GeneratedImage, ImageGenerator, ImageRequest, PORTRAIT_ASPECT_RATIO};
use crate::session::Session;
use crate::style::{compose_prompt, PromptPolicy};

/// Outcome of one generation request.
pub type GenerationResult = Result<GeneratedImage, GenerationError>;

/// Composes requests and forwards them to the image service.
///
/// The generator is the credential capability: `None` means no API key was
/// configured and every request fails with [`GenerationError::NotAuthenticated`].
pub struct Composer {
    generator: Option<Box<dyn ImageGenerator>>,
    model: String,
    policy: PromptPolicy,
}

impl Composer {
    /// Create a composer for the given model.
    #[must_use]
    pub fn new(
        generator: Option<Box<dyn ImageGenerator>>,
        model: impl Into<String>,
        policy: PromptPolicy,
    ) -> Self {
        Self { generator, model: model.into(), policy }
    }

    /// Whether a service client is configured.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.generator.is_some()
    }

    /// Build the request that [`Composer::generate`] would send.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidStyle`] for an unknown style.
    pub fn build_request(
        &self,
        style: &str,
        user_text: &str,
        seed: u32,
    ) -> Result<ImageRequest, GenerationError> {
        let prompt = compose_prompt(style, user_text, &self.policy)?;
        Ok(ImageRequest {
            model: self.model.clone(),
            prompt,
            seed: self.policy.send_seed.then_some(seed),
            aspect_ratio: PORTRAIT_ASPECT_RATIO.to_string(),
            number_of_images: 1,
        })
    }

    /// Generate one image. A single attempt; nothing is retried.
    ///
    /// # Errors
    ///
    /// Every failure is reported as a [`GenerationError`].
    pub async fn generate(&self, style: &str, user_text: &str, seed: u32) -> GenerationResult {
        let generator = self.generator.as_ref().ok_or(GenerationError::NotAuthenticated)?;
        let request = self.build_request(style, user_text, seed)?;

        tracing::info!(model = %request.model, seed = ?request.seed, "requesting image");
        tracing::debug!(prompt = %request.prompt, "composed prompt");

        let response = generator.generate(&request).await.map_err(|e| {
            let classified = GenerationError::from_service(&e);
            tracing::warn!(error = %e, "image service call failed");
            classified
        })?;

        tracing::debug!(count = response.images.len(), "image service returned");
        response.images.into_iter().next().ok_or(GenerationError::EmptyResult)
    }

    /// Generate using the session's current seed, tracking its phase.
    ///
    /// # Errors
    ///
    /// Same as [`Composer::generate`].
    pub async fn generate_in(
        &self,
        session: &mut Session,
        style: &str,
        user_text: &str,
    ) -> GenerationResult {
        let seed = session.begin_request();
        let result = self.generate(style, user_text, seed).await;
        session.finish_request(result.is_ok());
        result
    }
}

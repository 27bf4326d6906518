//! Error types for imagen-studio.

use thiserror::Error;

/// Infrastructure errors: transport, I/O, configuration.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image service returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code (0 when replayed from a cassette).
        status: u16,
        /// Error body or message from the service.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// A generation request failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Why a single generation request failed.
///
/// Every failure of [`crate::composer::Composer::generate`] is one of these;
/// none escape the request boundary in any other form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No API key is configured, so no service client exists.
    #[error("No API key configured. Set GEMINI_API_KEY (or GOOGLE_API_KEY) or add [keys] gemini to the config file.")]
    NotAuthenticated,

    /// The style label is not one of the fixed presets.
    #[error("Unknown style '{label}'. Valid: {valid}")]
    InvalidStyle {
        /// The label that was requested.
        label: String,
        /// Comma-separated list of valid keys.
        valid: String,
    },

    /// The service succeeded but returned no images.
    #[error("Generation failed: the service returned no images")]
    EmptyResult,

    /// The service refused the call for billing or quota reasons.
    #[error("Generation failed: {0}")]
    QuotaOrBilling(String),

    /// Any other service failure, passed through verbatim.
    #[error("Generation failed: {0}")]
    UnknownService(String),
}

impl GenerationError {
    /// Remediation hint shown alongside the error message, if any.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::QuotaOrBilling(_) => Some(
                "Billing is not set up for this API key, or the free usage quota has been exhausted.",
            ),
            _ => None,
        }
    }

    /// Classify a service failure into quota/billing or unknown.
    #[must_use]
    pub fn from_service(err: &ImageError) -> Self {
        let detail = err.to_string();
        let status = match err {
            ImageError::Api { status, .. } => *status,
            ImageError::Network(e) => e.status().map_or(0, |s| s.as_u16()),
            _ => 0,
        };
        if status == 403 || status == 429 || mentions_quota(&detail) {
            Self::QuotaOrBilling(detail)
        } else {
            Self::UnknownService(detail)
        }
    }
}

fn mentions_quota(detail: &str) -> bool {
    let lower = detail.to_ascii_lowercase();
    lower.contains("403")
        || lower.contains("quota")
        || lower.contains("billing")
        || lower.contains("resource_exhausted")
}

//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::style::PromptPolicy;

/// Default Imagen REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Defaults used when the matching CLI flag is not given.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Prompt and request policy.
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Service endpoint settings.
    #[serde(default)]
    pub service: ServiceConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Default parameter values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default model name or alias.
    pub model: String,
    /// Default style preset key.
    pub style: String,
    /// Default output format.
    pub format: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: "imagen-3".to_string(),
            style: "photorealistic".to_string(),
            format: "png".to_string(),
        }
    }
}

/// `[prompt]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Append the quality suffix to every prompt.
    pub quality_suffix: bool,
    /// Send the session seed with each request.
    pub send_seed: bool,
}

impl Default for PromptConfig {
    fn default() -> Self {
        let policy = PromptPolicy::default();
        Self { quality_suffix: policy.quality_suffix, send_seed: policy.send_seed }
    }
}

/// `[service]` section.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceConfig {
    /// Override for the Imagen REST base URL.
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the Gemini API key: `GEMINI_API_KEY`, then `GOOGLE_API_KEY`, then the file.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
            .or_else(|| self.keys.gemini.clone().filter(|v| !v.trim().is_empty()))
    }

    /// The prompt policy described by the `[prompt]` section.
    #[must_use]
    pub fn policy(&self) -> PromptPolicy {
        PromptPolicy { quality_suffix: self.prompt.quality_suffix, send_seed: self.prompt.send_seed }
    }

    /// The Imagen base URL, honoring the `[service]` override.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.service.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `IMAGEN_STUDIO_CONFIG` environment variable
/// 3. `~/.config/imagen-studio/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("IMAGEN_STUDIO_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/imagen-studio/config.toml")
    } else {
        PathBuf::from("imagen-studio.toml")
    }
}

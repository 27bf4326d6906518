//! Fixed style presets and prompt composition.

use crate::error::GenerationError;

/// A named style fragment prepended to the user's scene description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    /// Lookup key used on the command line.
    pub key: &'static str,
    /// Human-facing label.
    pub label: &'static str,
    /// Prompt text steering the visual style.
    pub fragment: &'static str,
}

/// The full preset table. Not user-extensible.
pub const PRESETS: &[StylePreset] = &[
    StylePreset {
        key: "photorealistic",
        label: "Photorealistic",
        fragment: "Photorealistic, highly detailed, 8k, realistic lighting, raw photo",
    },
    StylePreset {
        key: "anime",
        label: "Anime",
        fragment: "Anime style, studio ghibli inspired, vibrant colors, clean lines",
    },
    StylePreset {
        key: "watercolor",
        label: "Watercolor",
        fragment: "Watercolor painting, soft edges, artistic, dreamy atmosphere",
    },
];

/// Appended after the scene description when the quality suffix is enabled.
pub const QUALITY_SUFFIX: &str = ", masterpiece, best quality.";

/// How prompts and requests are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptPolicy {
    /// Append [`QUALITY_SUFFIX`] to every prompt.
    pub quality_suffix: bool,
    /// Send the session seed to the service.
    pub send_seed: bool,
}

impl Default for PromptPolicy {
    fn default() -> Self {
        Self { quality_suffix: true, send_seed: true }
    }
}

/// Look up a preset by key.
#[must_use]
pub fn find_preset(key: &str) -> Option<&'static StylePreset> {
    PRESETS.iter().find(|p| p.key == key)
}

/// Comma-separated list of valid preset keys.
#[must_use]
pub fn valid_keys() -> String {
    PRESETS.iter().map(|p| p.key).collect::<Vec<_>>().join(", ")
}

/// Build the full prompt for a style and a free-text scene description.
///
/// Blank user text yields a style-only prompt.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidStyle`] if `style_key` is not a preset.
pub fn compose_prompt(
    style_key: &str,
    user_text: &str,
    policy: &PromptPolicy,
) -> Result<String, GenerationError> {
    let preset = find_preset(style_key).ok_or_else(|| GenerationError::InvalidStyle {
        label: style_key.to_string(),
        valid: valid_keys(),
    })?;

    let mut prompt = String::from(preset.fragment);
    if !user_text.trim().is_empty() {
        prompt.push_str(", ");
        prompt.push_str(user_text);
    }
    if policy.quality_suffix {
        prompt.push_str(QUALITY_SUFFIX);
    }
    Ok(prompt)
}

//! File naming, image saving, and format conversion.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ImageError;
use crate::params::format_extension;

/// Generate an output filename from the scene text, seed and format.
///
/// Sanitizes the first 40 characters of the scene to kebab-case, then
/// appends the seed and a unix timestamp.
#[must_use]
pub fn auto_filename(scene: &str, seed: u32, format: &str) -> String {
    let sanitized = sanitize_for_filename(scene, 40);
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    let ext = format_extension(format);
    format!("{sanitized}-{seed}-{timestamp}.{ext}")
}

/// Sanitize a string for use in a filename.
///
/// Lowercases ASCII alphanumerics, folds every other run of characters into
/// one hyphen, and trims to `max_len`.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true;

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "image".to_string()
    } else {
        result
    }
}

/// Save raw image bytes to a file, converting format if necessary.
///
/// # Errors
///
/// Returns an error if the file cannot be written or format conversion fails.
pub fn save_image(
    data: &[u8],
    source_mime: &str,
    target_format: &str,
    output_path: &Path,
) -> Result<(), ImageError> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    if mime_matches_format(source_mime, target_format) {
        std::fs::write(output_path, data).map_err(ImageError::Io)
    } else {
        tracing::debug!(from = source_mime, to = target_format, "converting image");
        convert_and_save(data, target_format, output_path)
    }
}

fn mime_matches_format(mime: &str, format: &str) -> bool {
    matches!((mime, format), ("image/jpeg", "jpeg") | ("image/png", "png") | ("image/webp", "webp"))
}

fn convert_and_save(
    data: &[u8],
    target_format: &str,
    output_path: &Path,
) -> Result<(), ImageError> {
    let img = image::load_from_memory(data)
        .map_err(|e| ImageError::ImageConversion(format!("Failed to decode image: {e}")))?;

    let image_format = match target_format {
        "jpeg" => image::ImageFormat::Jpeg,
        "png" => image::ImageFormat::Png,
        "webp" => image::ImageFormat::WebP,
        other => {
            return Err(ImageError::ImageConversion(format!("Unsupported format: {other}")));
        }
    };

    // JPEG has no alpha channel
    let img = if image_format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    img.save_with_format(output_path, image_format)
        .map_err(|e| ImageError::ImageConversion(format!("Failed to save as {target_format}: {e}")))
}

/// Resolve the output path: use explicit path or auto-generate.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, scene: &str, seed: u32, format: &str) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(auto_filename(scene, seed, format)),
    }
}

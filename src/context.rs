//! Builds the image generator for the selected run mode.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::imagen::ImagenGenerator;
use crate::adapters::recording::RecordingImageGenerator;
use crate::adapters::replaying::ReplayingImageGenerator;
use crate::cassette::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::ImageError;
use crate::ports::ImageGenerator;

/// Holds the generator, if a credential allowed one to be built.
pub struct ServiceContext {
    /// Image generator port; `None` when no API key is configured.
    pub generator: Option<Box<dyn ImageGenerator>>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator still holds the recorder or the
    /// cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context. A missing API key yields no generator rather
    /// than an error; the composer reports it per request.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        let generator = config.gemini_key().map(|key| {
            tracing::debug!(base_url = config.base_url(), "using live Imagen endpoint");
            Box::new(ImagenGenerator::new(key, config.base_url())) as Box<dyn ImageGenerator>
        });
        Self { generator }
    }

    /// Create a recording context that wraps the live generator.
    ///
    /// Without an API key there is nothing to record, so the context has no
    /// generator and no session.
    #[must_use]
    pub fn recording(config: &Config) -> (Self, Option<RecordingSession>) {
        let Some(live) = Self::live(config).generator else {
            return (Self { generator: None }, None);
        };

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".imagen-studio/cassettes")
            .join(&timestamp)
            .join("image_generator.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-image_generator"),
            commit_hash(),
        )));

        let generator = Box::new(RecordingImageGenerator::new(live, Arc::clone(&recorder)));
        (Self { generator: Some(generator) }, Some(RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, ImageError> {
        let replayer = load_cassette(path)
            .map_err(|e| ImageError::Config(format!("Failed to load cassette: {e}")))?;
        let generator = ReplayingImageGenerator::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { generator: Some(Box::new(generator)) })
    }
}

/// Current git commit hash, or "unknown" if unavailable.
fn commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}

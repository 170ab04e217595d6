//! Error types for media probing and rendering.

use thiserror::Error;

use reelsmith_pipeline::StageError;

/// Result type alias using the media error type.
pub type Result<T> = std::result::Result<T, MediaError>;

/// Error type for the render stage and media probing.
#[derive(Debug, Error)]
pub enum MediaError {
    /// A required external binary (ffmpeg/ffprobe) is not installed.
    #[error("required tool not found: {0}")]
    MissingTool(String),

    /// The encoder ran and failed.
    #[error("ffmpeg failed: {0}")]
    Ffmpeg(String),

    /// Duration probing failed or produced an unparseable value.
    #[error("probe failed for {path}: {message}")]
    Probe { path: String, message: String },

    /// Render was invoked with nothing to merge.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The footage cannot cover the narration even with loop absorption.
    #[error("footage covers {covered:.1}s of a {needed:.1}s narration")]
    Shortfall { covered: f64, needed: f64 },

    /// A clip could not be fetched into the workspace.
    #[error("clip download failed for {url}: {message}")]
    Download { url: String, message: String },

    /// Filesystem error in the run workspace.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Every media failure classifies as a render failure for the run.
impl From<MediaError> for StageError {
    fn from(err: MediaError) -> Self {
        StageError::Render(err.to_string())
    }
}

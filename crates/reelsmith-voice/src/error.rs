//! Error types for the narration stage.

use thiserror::Error;

use reelsmith_pipeline::StageError;

/// Result type alias using the voice error type.
pub type Result<T> = std::result::Result<T, VoiceError>;

/// Error type for voice synthesis.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// Authentication failed at the speech service.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The service rate-limited the request or the quota is spent.
    #[error("rate limited: {0}")]
    Quota(String),

    /// Service-side error.
    #[error("backend error: {0}")]
    Backend(String),

    /// Network/connectivity error.
    #[error("network error: {0}")]
    Network(String),

    /// The service streamed no audio bytes.
    #[error("empty audio stream")]
    EmptyAudio,

    /// Synthesized audio could not be measured.
    #[error("duration measurement failed: {0}")]
    Measurement(String),

    /// Client construction or configuration problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error writing into the run workspace.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for VoiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VoiceError::Network(format!("request timed out: {}", err))
        } else if err.is_connect() {
            VoiceError::Network(format!("connection failed: {}", err))
        } else {
            VoiceError::Network(err.to_string())
        }
    }
}

/// Every narration-stage failure classifies as a synthesis failure for the run.
impl From<VoiceError> for StageError {
    fn from(err: VoiceError) -> Self {
        StageError::Synthesis(err.to_string())
    }
}

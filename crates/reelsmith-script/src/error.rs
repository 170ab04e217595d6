//! Error types for the script stage.

use thiserror::Error;

use reelsmith_pipeline::StageError;

/// Result type alias using the script error type.
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Error type for script generation.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Authentication failed at the text-generation service.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The service rate-limited the request.
    #[error("rate limited: {0}")]
    Quota(String),

    /// Service-side error.
    #[error("backend error: {0}")]
    Backend(String),

    /// Network/connectivity error.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The service returned no usable content.
    #[error("empty completion")]
    Empty,

    /// Content could not be segmented into narration units.
    #[error("unsegmentable content: {0}")]
    Unsegmentable(String),

    /// Client construction or configuration problem.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ScriptError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScriptError::Network(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ScriptError::Network(format!("connection failed: {}", err))
        } else {
            ScriptError::Network(err.to_string())
        }
    }
}

/// Every script-stage failure classifies as a generation failure for the run.
impl From<ScriptError> for StageError {
    fn from(err: ScriptError) -> Self {
        StageError::Generation(err.to_string())
    }
}

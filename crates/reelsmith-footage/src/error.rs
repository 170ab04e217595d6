//! Error types for the footage stage.

use thiserror::Error;

use reelsmith_pipeline::StageError;

/// Result type alias using the footage error type.
pub type Result<T> = std::result::Result<T, FootageError>;

/// Error type for footage sourcing.
#[derive(Debug, Error)]
pub enum FootageError {
    /// Authentication failed at the stock provider.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider rate-limited the request.
    #[error("rate limited: {0}")]
    Quota(String),

    /// Provider-side error.
    #[error("backend error: {0}")]
    Backend(String),

    /// Network/connectivity error.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Accumulated footage cannot cover the narration.
    #[error("accumulated {accumulated:.1}s of footage for a {needed:.1}s narration")]
    Insufficient { accumulated: f64, needed: f64 },

    /// Client construction or configuration problem.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for FootageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FootageError::Network(format!("request timed out: {}", err))
        } else if err.is_connect() {
            FootageError::Network(format!("connection failed: {}", err))
        } else {
            FootageError::Network(err.to_string())
        }
    }
}

/// Every footage-stage failure classifies as a sourcing failure for the run.
impl From<FootageError> for StageError {
    fn from(err: FootageError) -> Self {
        StageError::Sourcing(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_as_sourcing_failure() {
        let stage: StageError = FootageError::Insufficient {
            accumulated: 31.0,
            needed: 58.5,
        }
        .into();
        assert_eq!(stage.kind(), "sourcing_failure");
        assert!(stage.to_string().contains("31.0s"));
    }
}

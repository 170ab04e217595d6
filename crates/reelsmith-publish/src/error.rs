//! Error types for the publish stage.
//!
//! Three failure classes matter operationally: auth failures mean
//! the operator must rotate a credential, quota failures mean retry later,
//! upload failures mean look at the transport or the file.

use thiserror::Error;

use reelsmith_pipeline::StageError;

/// Result type alias using the publish error type.
pub type Result<T> = std::result::Result<T, PublishError>;

/// Error type for video publishing.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Bad or expired refresh credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Platform rate limiting or spent quota.
    #[error("quota exceeded: {0}")]
    Quota(String),

    /// The platform rejected the upload.
    #[error("upload rejected: {0}")]
    Upload(String),

    /// Network/connectivity error.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Client construction or configuration problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error reading the rendered artifact.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PublishError::Network(format!("request timed out: {}", err))
        } else if err.is_connect() {
            PublishError::Network(format!("connection failed: {}", err))
        } else {
            PublishError::Network(err.to_string())
        }
    }
}

/// Auth and quota failures keep their own run-level kinds; everything else in
/// this stage is an upload failure.
impl From<PublishError> for StageError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::Auth(message) => StageError::Auth(message),
            PublishError::Quota(message) => StageError::Quota(message),
            other => StageError::Upload(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_and_quota_keep_their_kind() {
        let stage: StageError = PublishError::Auth("refresh token expired".into()).into();
        assert_eq!(stage.kind(), "auth_failure");

        let stage: StageError = PublishError::Quota("uploadLimitExceeded".into()).into();
        assert_eq!(stage.kind(), "quota_failure");
    }

    #[test]
    fn test_everything_else_is_upload_failure() {
        let stage: StageError = PublishError::Network("reset by peer".into()).into();
        assert_eq!(stage.kind(), "upload_failure");

        let stage: StageError = PublishError::Upload("invalid video".into()).into();
        assert_eq!(stage.kind(), "upload_failure");
    }
}

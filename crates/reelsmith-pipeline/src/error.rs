//! Stage failure taxonomy.
//!
//! One variant per failure class from the error-handling contract. Each stage
//! crate owns the conversion from its local error type into this taxonomy, so
//! classification decisions live next to the service that produced them.

use thiserror::Error;

/// Result type alias using the stage error type.
pub type Result<T> = std::result::Result<T, StageError>;

/// A classified stage failure.
///
/// Every variant except `Notify` is terminal for the run. `Notify` is logged
/// and surfaced as a non-terminal event when the deliverable was already
/// produced.
#[derive(Debug, Clone, Error)]
pub enum StageError {
    /// Script stage: text-generation call failed or produced unusable output.
    #[error("script generation failed: {0}")]
    Generation(String),

    /// Narration stage: voice synthesis failed or produced empty audio.
    #[error("voice synthesis failed: {0}")]
    Synthesis(String),

    /// Footage stage: could not accumulate enough acceptable footage.
    #[error("footage sourcing failed: {0}")]
    Sourcing(String),

    /// Render stage: encoder error, missing tooling, or empty inputs.
    #[error("render failed: {0}")]
    Render(String),

    /// Publish stage: bad or expired refresh credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Publish stage: platform rate limiting. Operators should retry later
    /// rather than touch configuration.
    #[error("quota exceeded: {0}")]
    Quota(String),

    /// Publish stage: transport or encoding rejection during upload.
    #[error("upload failed: {0}")]
    Upload(String),

    /// Notify stage: webhook delivery failed. Never terminal on its own.
    #[error("webhook delivery failed: {0}")]
    Notify(String),

    /// Run workspace could not be prepared; precedes every stage.
    #[error("run workspace unavailable: {0}")]
    Workspace(String),
}

impl StageError {
    /// Stable machine-readable failure kind, carried in error event metadata.
    pub fn kind(&self) -> &'static str {
        match self {
            StageError::Generation(_) => "generation_failure",
            StageError::Synthesis(_) => "synthesis_failure",
            StageError::Sourcing(_) => "sourcing_failure",
            StageError::Render(_) => "render_failure",
            StageError::Auth(_) => "auth_failure",
            StageError::Quota(_) => "quota_failure",
            StageError::Upload(_) => "upload_failure",
            StageError::Notify(_) => "notify_failure",
            StageError::Workspace(_) => "workspace_failure",
        }
    }

    /// True when the failure halts the run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StageError::Notify(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(StageError::Auth("expired".into()).kind(), "auth_failure");
        assert_eq!(StageError::Quota("429".into()).kind(), "quota_failure");
        assert_eq!(
            StageError::Sourcing("short".into()).kind(),
            "sourcing_failure"
        );
    }

    #[test]
    fn test_only_notify_is_non_terminal() {
        assert!(!StageError::Notify("timeout".into()).is_terminal());
        assert!(StageError::Generation("empty".into()).is_terminal());
        assert!(StageError::Upload("rejected".into()).is_terminal());
        assert!(StageError::Workspace("mkdir".into()).is_terminal());
    }

    #[test]
    fn test_display_names_the_stage() {
        let err = StageError::Synthesis("zero-duration output".into());
        assert!(err.to_string().contains("voice synthesis"));
    }
}

//! Notify stage: delivers the run summary to the configured webhook.
//!
//! Best-effort by contract: a missing URL is a no-op success, and a delivery
//! failure surfaces as a non-terminal event without touching the run outcome.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use reelsmith_pipeline::{NotifyStage, RunSummary, StageError};
use reelsmith_types::RunConfig;

/// Delivery timeout. Receivers that cannot accept a small JSON document in
/// this window are treated as failed, not waited on.
const DELIVERY_TIMEOUT_SECS: u64 = 10;

/// Result type alias using the webhook error type.
pub type Result<T> = std::result::Result<T, WebhookError>;

/// Error type for webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The receiver could not be reached.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// The receiver answered with a non-success status.
    #[error("receiver rejected delivery: HTTP {0}")]
    Rejected(u16),

    /// Client construction problem.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for WebhookError {
    fn from(err: reqwest::Error) -> Self {
        WebhookError::Delivery(err.to_string())
    }
}

impl From<WebhookError> for StageError {
    fn from(err: WebhookError) -> Self {
        StageError::Notify(err.to_string())
    }
}

/// Production notify stage.
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DELIVERY_TIMEOUT_SECS))
            .build()
            .map_err(|e| WebhookError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn notify_inner(&self, config: &RunConfig, summary: &RunSummary) -> Result<()> {
        let url = match config.webhook_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => {
                debug!(run_id = %summary.run_id, "no webhook configured, skipping");
                return Ok(());
            }
        };

        let response = self.client.post(url).json(summary).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!(url = %url, status, "webhook receiver rejected delivery");
            return Err(WebhookError::Rejected(status));
        }

        debug!(url = %url, run_id = %summary.run_id, "run summary delivered");
        Ok(())
    }
}

#[async_trait]
impl NotifyStage for WebhookNotifier {
    async fn notify(
        &self,
        config: &RunConfig,
        summary: &RunSummary,
    ) -> std::result::Result<(), StageError> {
        Ok(self.notify_inner(config, summary).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reelsmith_types::{Credentials, Preset, PublishResult, Visibility};
    use uuid::Uuid;

    fn summary() -> RunSummary {
        RunSummary {
            run_id: Uuid::new_v4(),
            topic: "the deep ocean".to_string(),
            result: PublishResult {
                video_id: "vid-1".to_string(),
                url: "https://youtu.be/vid-1".to_string(),
                visibility: "unlisted".to_string(),
                title: "t".to_string(),
                description: "d".to_string(),
            },
            completed_at: Utc::now(),
        }
    }

    fn config_without_webhook() -> RunConfig {
        RunConfig {
            topic: "the deep ocean".to_string(),
            duration_secs: 60,
            voice: "narrator-1".to_string(),
            preset: Preset::Facts,
            instructions: String::new(),
            context: String::new(),
            title_template: "t".to_string(),
            description_template: "d".to_string(),
            tags: vec![],
            visibility: Visibility::Unlisted,
            allow_copyrighted_audio: false,
            webhook_url: None,
            credentials: Credentials::default(),
        }
    }

    #[tokio::test]
    async fn test_missing_url_is_noop_success() {
        let notifier = WebhookNotifier::new().unwrap();
        let result = notifier
            .notify_inner(&config_without_webhook(), &summary())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_blank_url_is_noop_success() {
        let notifier = WebhookNotifier::new().unwrap();
        let mut config = config_without_webhook();
        config.webhook_url = Some("   ".to_string());
        let result = notifier.notify_inner(&config, &summary()).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_failures_classify_as_notify() {
        let stage: StageError = WebhookError::Rejected(500).into();
        assert_eq!(stage.kind(), "notify_failure");
        assert!(!stage.is_terminal());
    }
}

//! Publish stage: pushes the rendered video to the platform.
//!
//! Expands the title/description templates against the run's date and topic,
//! derives a short-lived access token from the refresh credential, and runs
//! the resumable upload. No interactive consent anywhere in the path.

mod error;
mod oauth;
mod template;
mod upload;

pub use error::{PublishError, Result};
pub use oauth::{AccessToken, refresh_access_token};
pub use template::expand;
pub use upload::{Snippet, UploadMetadata, UploadStatus, upload_video};

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use reelsmith_pipeline::{PublishStage, StageError};
use reelsmith_types::{PublishResult, RenderedVideo, RunConfig};

/// Default timeout for publish requests. The PUT carries the whole file.
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Endpoint overrides, for tests against a local server.
#[derive(Debug, Clone, Default)]
pub struct PublishConfig {
    pub token_url: Option<String>,
    pub upload_url: Option<String>,
}

/// Production publish stage.
pub struct VideoPublisher {
    client: reqwest::Client,
    config: PublishConfig,
}

impl VideoPublisher {
    pub fn new(config: PublishConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| PublishError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn publish_inner(
        &self,
        config: &RunConfig,
        video: RenderedVideo,
    ) -> Result<PublishResult> {
        let video_path = video.video.as_path().ok_or_else(|| {
            PublishError::Config("rendered video is not a local file".to_string())
        })?;

        let today = Utc::now().date_naive();
        let title = template::expand(&config.title_template, &config.topic, today);
        let description = template::expand(&config.description_template, &config.topic, today);

        let access = oauth::refresh_access_token(
            &self.client,
            self.config.token_url.as_deref(),
            &config.credentials,
        )
        .await?;

        let metadata = UploadMetadata {
            snippet: Snippet {
                title: title.clone(),
                description: description.clone(),
                tags: config.tags.clone(),
            },
            status: UploadStatus {
                privacy_status: config.visibility.as_str().to_string(),
            },
        };

        let video_id = upload::upload_video(
            &self.client,
            self.config.upload_url.as_deref(),
            &access.token,
            &metadata,
            video_path,
        )
        .await?;

        let url = format!("https://youtu.be/{}", video_id);
        info!(video_id = %video_id, url = %url, title = %title, "video published");

        Ok(PublishResult {
            video_id,
            url,
            visibility: config.visibility.as_str().to_string(),
            title,
            description,
        })
    }
}

#[async_trait]
impl PublishStage for VideoPublisher {
    async fn publish(
        &self,
        config: &RunConfig,
        video: RenderedVideo,
    ) -> std::result::Result<PublishResult, StageError> {
        Ok(self.publish_inner(config, video).await?)
    }
}

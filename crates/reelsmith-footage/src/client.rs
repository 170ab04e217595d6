//! Stock video search client.
//!
//! Speaks the Pexels-style video search API. Results come back as candidate
//! clips with a best-file resolution already chosen; selection policy lives in
//! the `select` module.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;

use reelsmith_types::{Clip, QualityTier};

use crate::error::{FootageError, Result};

/// Default API base URL.
const DEFAULT_API_BASE: &str = "https://api.pexels.com";

/// Results requested per search.
const DEFAULT_PER_PAGE: u32 = 10;

/// Default timeout for requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Minimum acceptable clip resolution.
pub const MIN_WIDTH: u32 = 1280;
pub const MIN_HEIGHT: u32 = 720;

/// Configuration for the stock search client.
#[derive(Debug, Clone)]
pub struct StockConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Results per search query.
    pub per_page: u32,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            per_page: DEFAULT_PER_PAGE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl StockConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Stock video search client.
pub struct StockClient {
    client: Client,
    config: StockConfig,
}

impl StockClient {
    /// Create a new client with the given configuration.
    pub fn new(config: StockConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FootageError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn search_url(&self) -> String {
        format!("{}/videos/search", self.config.base_url)
    }

    /// Search for clips matching `query`. With `muted_only`, restricts results
    /// to clips without an audio track, keeping copyrighted audio out of the
    /// final render.
    pub async fn search(&self, api_key: &str, query: &str, muted_only: bool) -> Result<Vec<Clip>> {
        let per_page = self.config.per_page.to_string();
        let min_width = MIN_WIDTH.to_string();
        let min_height = MIN_HEIGHT.to_string();
        let mut params = vec![
            ("query", query),
            ("per_page", per_page.as_str()),
            ("min_width", min_width.as_str()),
            ("min_height", min_height.as_str()),
        ];
        if muted_only {
            params.push(("muted", "true"));
        }

        let response = self
            .client
            .get(self.search_url())
            .header("Authorization", api_key)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| FootageError::Serialization(e.to_string()))?;

        Ok(parsed
            .videos
            .into_iter()
            .filter_map(candidate_from_video)
            .collect())
    }

    async fn handle_error_response(response: Response) -> FootageError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => FootageError::Auth(body),
            429 => FootageError::Quota(body),
            500..=599 => FootageError::Backend(format!("server error: {}", body)),
            _ => FootageError::Backend(format!("HTTP {}: {}", status, body)),
        }
    }
}

/// Reduce a search hit to one candidate clip: the highest-resolution file
/// meeting the minimum, or nothing if none qualifies.
fn candidate_from_video(video: ApiVideo) -> Option<Clip> {
    let best = video
        .video_files
        .into_iter()
        .filter(|f| f.width >= MIN_WIDTH && f.height >= MIN_HEIGHT)
        .max_by_key(|f| (f.height, f.width))?;

    Some(Clip {
        id: video.id,
        url: best.link,
        width: best.width,
        height: best.height,
        duration_secs: video.duration as f64,
        tier: QualityTier::from_height(best.height),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    videos: Vec<ApiVideo>,
}

#[derive(Debug, Deserialize)]
struct ApiVideo {
    id: u64,
    duration: u32,
    video_files: Vec<ApiVideoFile>,
}

#[derive(Debug, Deserialize)]
struct ApiVideoFile {
    link: String,
    width: u32,
    height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_picks_highest_qualifying_file() {
        let video = ApiVideo {
            id: 42,
            duration: 14,
            video_files: vec![
                ApiVideoFile {
                    link: "https://example.com/sd.mp4".to_string(),
                    width: 960,
                    height: 540,
                },
                ApiVideoFile {
                    link: "https://example.com/hd.mp4".to_string(),
                    width: 1920,
                    height: 1080,
                },
                ApiVideoFile {
                    link: "https://example.com/720.mp4".to_string(),
                    width: 1280,
                    height: 720,
                },
            ],
        };
        let clip = candidate_from_video(video).unwrap();
        assert_eq!(clip.url, "https://example.com/hd.mp4");
        assert_eq!(clip.tier, QualityTier::Hd);
        assert!((clip.duration_secs - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_candidate_rejects_below_minimum() {
        let video = ApiVideo {
            id: 7,
            duration: 9,
            video_files: vec![ApiVideoFile {
                link: "https://example.com/sd.mp4".to_string(),
                width: 960,
                height: 540,
            }],
        };
        assert!(candidate_from_video(video).is_none());
    }

    #[test]
    fn test_search_response_parsing() {
        let body = r#"{
            "videos": [
                {"id": 1, "duration": 12, "video_files": [
                    {"link": "https://example.com/a.mp4", "width": 1920, "height": 1080}
                ]}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.videos.len(), 1);
        assert_eq!(parsed.videos[0].id, 1);
    }
}

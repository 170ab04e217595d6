//! Resumable video upload.
//!
//! Two-step YouTube-style protocol: an initiation POST carrying the metadata
//! snippet returns a session URL in the `Location` header, then the file body
//! goes up in one PUT against that URL.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PublishError, Result};

/// Default upload initiation endpoint.
const DEFAULT_UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/youtube/v3/videos?uploadType=resumable&part=snippet,status";

/// Metadata sent with the initiation request.
#[derive(Debug, Serialize)]
pub struct UploadMetadata {
    pub snippet: Snippet,
    pub status: UploadStatus,
}

#[derive(Debug, Serialize)]
pub struct Snippet {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadStatus {
    #[serde(rename = "privacyStatus")]
    pub privacy_status: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

/// Run the resumable upload and return the platform video id.
pub async fn upload_video(
    client: &reqwest::Client,
    upload_url: Option<&str>,
    access_token: &str,
    metadata: &UploadMetadata,
    video_path: &Path,
) -> Result<String> {
    // Step 1: initiate the session.
    let response = client
        .post(upload_url.unwrap_or(DEFAULT_UPLOAD_URL))
        .bearer_auth(access_token)
        .json(metadata)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(classify_status(response).await);
    }

    let session_url = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            PublishError::Upload("initiation response carried no session URL".to_string())
        })?;

    // Step 2: send the file body.
    let bytes = tokio::fs::read(video_path).await?;
    debug!(bytes = bytes.len(), "uploading rendered video");

    let response = client
        .put(&session_url)
        .bearer_auth(access_token)
        .header(reqwest::header::CONTENT_TYPE, "video/mp4")
        .body(bytes)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(classify_status(response).await);
    }

    let parsed: UploadResponse = response
        .json()
        .await
        .map_err(|e| PublishError::Serialization(e.to_string()))?;

    Ok(parsed.id)
}

async fn classify_status(response: reqwest::Response) -> PublishError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match status.as_u16() {
        401 => PublishError::Auth(body),
        // 403 on this API is quota exhaustion far more often than permissions.
        403 | 429 => PublishError::Quota(body),
        _ => PublishError::Upload(format!("HTTP {}: {}", status, body)),
    }
}

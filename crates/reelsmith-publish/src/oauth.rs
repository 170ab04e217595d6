//! OAuth refresh-token exchange.
//!
//! The run carries a long-lived refresh token; this module derives the
//! short-lived access token the upload needs. Fully unattended: a refresh
//! token that no longer works is an auth failure, never an interactive
//! consent prompt.

use serde::Deserialize;

use reelsmith_types::Credentials;

use crate::error::{PublishError, Result};

/// Default token endpoint.
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// A derived short-lived access token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in_secs: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Exchange the refresh token for an access token.
pub async fn refresh_access_token(
    client: &reqwest::Client,
    token_url: Option<&str>,
    credentials: &Credentials,
) -> Result<AccessToken> {
    let params = [
        ("grant_type", "refresh_token"),
        ("client_id", credentials.upload_client_id.as_str()),
        ("client_secret", credentials.upload_client_secret.as_str()),
        ("refresh_token", credentials.upload_refresh_token.as_str()),
    ];

    let response = client
        .post(token_url.unwrap_or(DEFAULT_TOKEN_URL))
        .form(&params)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<TokenErrorResponse>(&body)
            .map(|e| {
                if e.error_description.is_empty() {
                    e.error
                } else {
                    format!("{}: {}", e.error, e.error_description)
                }
            })
            .unwrap_or(body);

        // invalid_grant is how the endpoint reports a revoked or expired
        // refresh token regardless of status code.
        if status.as_u16() == 401 || detail.starts_with("invalid_grant") {
            return Err(PublishError::Auth(detail));
        }
        return Err(PublishError::Upload(format!(
            "token exchange failed (HTTP {}): {}",
            status, detail
        )));
    }

    let parsed: TokenResponse = response
        .json()
        .await
        .map_err(|e| PublishError::Serialization(e.to_string()))?;

    if parsed.access_token.is_empty() {
        return Err(PublishError::Auth("empty access token".to_string()));
    }

    Ok(AccessToken {
        token: parsed.access_token,
        expires_in_secs: parsed.expires_in,
    })
}

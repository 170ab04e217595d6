//! Streaming text-to-speech client.
//!
//! Speaks the ElevenLabs-style streaming endpoint: one POST per narration,
//! response body is a raw audio byte stream written straight into the run
//! workspace. The API key travels with each call from the run's credential
//! set.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client, Response};
use serde::Serialize;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{Result, VoiceError};

/// Default API base URL.
const DEFAULT_API_BASE: &str = "https://api.elevenlabs.io";

/// Default synthesis model.
const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

/// Default timeout for requests. Synthesis of a minute of speech can take a
/// while, so this is generous.
const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Configuration for the speech client.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Synthesis model id.
    pub model_id: String,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SpeechConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Streaming speech client.
pub struct SpeechClient {
    client: Client,
    config: SpeechConfig,
}

impl SpeechClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SpeechConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VoiceError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn stream_url(&self, voice: &str) -> String {
        format!("{}/v1/text-to-speech/{}/stream", self.config.base_url, voice)
    }

    /// Synthesize `text` with `voice` and stream the audio into `dest`.
    /// Returns the number of audio bytes written.
    pub async fn synthesize(
        &self,
        api_key: &str,
        voice: &str,
        text: &str,
        dest: &Path,
    ) -> Result<u64> {
        let request = SynthesisRequest {
            text,
            model_id: &self.config.model_id,
        };

        let response = self
            .client
            .post(self.stream_url(voice))
            .header("xi-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        if written == 0 {
            return Err(VoiceError::EmptyAudio);
        }

        debug!(voice = %voice, bytes = written, path = %dest.display(), "narration streamed");
        Ok(written)
    }

    async fn handle_error_response(response: Response) -> VoiceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => VoiceError::Auth(body),
            429 => VoiceError::Quota(body),
            500..=599 => VoiceError::Backend(format!("server error: {}", body)),
            _ => VoiceError::Backend(format!("HTTP {}: {}", status, body)),
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url() {
        let client = SpeechClient::new(SpeechConfig::default()).unwrap();
        assert_eq!(
            client.stream_url("21m00Tcm4TlvDq8ikWAM"),
            "https://api.elevenlabs.io/v1/text-to-speech/21m00Tcm4TlvDq8ikWAM/stream"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = SynthesisRequest {
            text: "Hello there.",
            model_id: DEFAULT_MODEL_ID,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["text"], "Hello there.");
        assert_eq!(json["model_id"], "eleven_multilingual_v2");
    }
}

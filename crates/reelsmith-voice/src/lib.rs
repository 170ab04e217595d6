//! Narration stage: turns the script into spoken audio.
//!
//! Streams the full script text through a text-to-speech service into
//! `narration.mp3` inside the run workspace, then measures the real duration
//! with ffprobe. The measured value, not the script estimate, drives footage
//! sourcing and timeline planning downstream.

mod client;
mod error;

pub use client::{SpeechClient, SpeechConfig};
pub use error::{Result, VoiceError};

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use reelsmith_pipeline::{NarrationStage, StageError};
use reelsmith_types::{MediaRef, Narration, RunConfig, Script};

/// Filename of the narration artifact inside the run workspace.
pub const NARRATION_FILENAME: &str = "narration.mp3";

/// Production narration stage backed by a streaming speech service.
pub struct VoiceSynthesizer {
    client: SpeechClient,
}

impl VoiceSynthesizer {
    pub fn new(config: SpeechConfig) -> Result<Self> {
        Ok(Self {
            client: SpeechClient::new(config)?,
        })
    }

    async fn synthesize_inner(
        &self,
        config: &RunConfig,
        script: &Script,
        workdir: &Path,
    ) -> Result<Narration> {
        let text = script.full_text();
        if text.trim().is_empty() {
            return Err(VoiceError::EmptyAudio);
        }

        let dest = workdir.join(NARRATION_FILENAME);
        let bytes = self
            .client
            .synthesize(&config.credentials.voice_api_key, &config.voice, &text, &dest)
            .await?;

        let duration_secs = reelsmith_media::probe_duration(&dest)
            .await
            .map_err(|e| VoiceError::Measurement(e.to_string()))?;

        info!(
            voice = %config.voice,
            bytes,
            duration_secs,
            estimated_secs = script.estimated_secs(),
            "narration synthesized"
        );

        Ok(Narration {
            audio: MediaRef::File(dest),
            duration_secs,
        })
    }
}

#[async_trait]
impl NarrationStage for VoiceSynthesizer {
    async fn synthesize(
        &self,
        config: &RunConfig,
        script: &Script,
        workdir: &Path,
    ) -> std::result::Result<Narration, StageError> {
        Ok(self.synthesize_inner(config, script, workdir).await?)
    }
}

//! Script stage: preset-driven text generation and segmentation.
//!
//! Turns a run's topic into an ordered set of narration segments by prompting
//! a chat-completion service and parsing the result. Duration estimates on
//! each segment drive footage allotment downstream.

mod client;
mod error;
mod prompt;

pub use client::{ChatClient, ChatConfig};
pub use error::{Result, ScriptError};
pub use prompt::{PresetProfile, WORDS_PER_SECOND, estimate_secs, parse_script};

use async_trait::async_trait;
use tracing::{debug, info};

use reelsmith_pipeline::{ScriptStage, StageError};
use reelsmith_types::{RunConfig, Script};

/// Production script stage backed by a chat-completion service.
pub struct ScriptGenerator {
    client: ChatClient,
}

impl ScriptGenerator {
    pub fn new(config: ChatConfig) -> Result<Self> {
        Ok(Self {
            client: ChatClient::new(config)?,
        })
    }

    async fn generate_inner(&self, config: &RunConfig) -> Result<Script> {
        let system = prompt::build_system_prompt(config);
        let user = prompt::build_user_prompt(config);

        debug!(topic = %config.topic, preset = %config.preset, "requesting completion");
        let content = self
            .client
            .complete(&config.credentials.text_api_key, &system, &user)
            .await?;

        let script = prompt::parse_script(&content)?;
        info!(
            segments = script.segments.len(),
            estimated_secs = script.estimated_secs(),
            "script generated"
        );
        Ok(script)
    }
}

#[async_trait]
impl ScriptStage for ScriptGenerator {
    async fn generate(&self, config: &RunConfig) -> std::result::Result<Script, StageError> {
        Ok(self.generate_inner(config).await?)
    }
}

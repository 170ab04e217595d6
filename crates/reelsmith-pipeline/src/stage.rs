//! Stage contracts.
//!
//! One trait per pipeline stage, each wrapping a single external capability
//! and a single artifact transformation. The conductor owns the `RunConfig`
//! and the artifacts between calls; artifacts consumed exactly once are passed
//! by value (ownership hand-off), artifacts consumed by more than one stage
//! (the script) are borrowed.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use reelsmith_types::{
    FootageSet, Narration, PublishResult, RenderedVideo, RunConfig, Script,
};

use crate::error::Result;

/// Produces the script from the run configuration.
#[async_trait]
pub trait ScriptStage: Send + Sync {
    async fn generate(&self, config: &RunConfig) -> Result<Script>;
}

/// Synthesizes the narration audio for a script, writing into the run
/// workspace, and measures the resulting duration.
#[async_trait]
pub trait NarrationStage: Send + Sync {
    async fn synthesize(
        &self,
        config: &RunConfig,
        script: &Script,
        workdir: &Path,
    ) -> Result<Narration>;
}

/// Sources stock clips covering at least the narration duration.
#[async_trait]
pub trait FootageStage: Send + Sync {
    async fn source(
        &self,
        config: &RunConfig,
        script: &Script,
        narration_secs: f64,
    ) -> Result<FootageSet>;
}

/// Merges narration and footage into one encoded video.
#[async_trait]
pub trait RenderStage: Send + Sync {
    async fn render(
        &self,
        config: &RunConfig,
        narration: Narration,
        footage: FootageSet,
        workdir: &Path,
    ) -> Result<RenderedVideo>;
}

/// Uploads the rendered video and returns the durable platform reference.
#[async_trait]
pub trait PublishStage: Send + Sync {
    async fn publish(&self, config: &RunConfig, video: RenderedVideo) -> Result<PublishResult>;
}

/// Delivers the run summary to the configured webhook, if any.
///
/// A missing webhook URL is a no-op success; a delivery failure never blocks
/// the overall run outcome.
#[async_trait]
pub trait NotifyStage: Send + Sync {
    async fn notify(&self, config: &RunConfig, summary: &RunSummary) -> Result<()>;
}

/// Run metadata handed to the notify stage alongside the publish result.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub topic: String,
    pub result: PublishResult,
    pub completed_at: DateTime<Utc>,
}

/// The full set of stage implementations driving one conductor.
#[derive(Clone)]
pub struct Stages {
    pub script: Arc<dyn ScriptStage>,
    pub narration: Arc<dyn NarrationStage>,
    pub footage: Arc<dyn FootageStage>,
    pub render: Arc<dyn RenderStage>,
    pub publish: Arc<dyn PublishStage>,
    pub notify: Arc<dyn NotifyStage>,
}

/// Stage set shared across runs. The stages themselves hold no per-run state;
/// every run gets its own conductor and artifact set.
pub type SharedStages = Arc<Stages>;

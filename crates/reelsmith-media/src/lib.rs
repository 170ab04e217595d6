//! Render stage: deterministic timeline merge of narration and footage.
//!
//! Downloads the sourced clips into the run workspace, plans an exact cut
//! list against the measured narration duration, and drives ffmpeg to produce
//! one encoded file. Audio is never sped up or slowed down to fit; timing
//! differences are absorbed on the video side only.
//!
//! Also home to [`probe_duration`], used by the narration stage to measure
//! synthesized audio.

mod error;
mod probe;
mod render;
mod timeline;

pub use error::{MediaError, Result};
pub use probe::probe_duration;
pub use render::{download_clip, filter_graph};
pub use timeline::{TimelineEntry, plan_timeline};

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use reelsmith_pipeline::{RenderStage, StageError};
use reelsmith_types::{FootageSet, MediaRef, Narration, RenderedVideo, RunConfig};

/// Production render stage driving ffmpeg.
pub struct VideoRenderer {
    client: reqwest::Client,
}

impl VideoRenderer {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn render_inner(
        &self,
        narration: Narration,
        footage: FootageSet,
        workdir: &Path,
    ) -> Result<RenderedVideo> {
        if footage.is_empty() {
            return Err(MediaError::EmptyInput("footage set is empty".to_string()));
        }
        let narration_path = narration
            .audio
            .as_path()
            .ok_or_else(|| MediaError::EmptyInput("narration is not a local file".to_string()))?;

        // Fetch every clip before planning, so the plan can use real durations
        // rather than the provider's advertised ones.
        let mut clip_paths: Vec<PathBuf> = Vec::with_capacity(footage.clips.len());
        let mut clip_durations: Vec<f64> = Vec::with_capacity(footage.clips.len());
        for (i, clip) in footage.clips.iter().enumerate() {
            let dest = workdir.join(format!("clip-{:02}.mp4", i));
            render::download_clip(&self.client, &clip.url, &dest).await?;
            clip_durations.push(probe::probe_duration(&dest).await?);
            clip_paths.push(dest);
        }

        let plan = timeline::plan_timeline(&clip_durations, narration.duration_secs)?;

        let output = workdir.join("output.mp4");
        let clip_refs: Vec<&Path> = clip_paths.iter().map(PathBuf::as_path).collect();
        render::encode(&clip_refs, narration_path, &plan, &output).await?;

        let duration_secs = probe::probe_duration(&output).await?;
        info!(
            clips = footage.clips.len(),
            cuts = plan.len(),
            duration_secs,
            path = %output.display(),
            "render complete"
        );

        Ok(RenderedVideo {
            video: MediaRef::File(output),
            duration_secs,
        })
    }
}

impl Default for VideoRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RenderStage for VideoRenderer {
    async fn render(
        &self,
        _config: &RunConfig,
        narration: Narration,
        footage: FootageSet,
        workdir: &Path,
    ) -> std::result::Result<RenderedVideo, StageError> {
        Ok(self.render_inner(narration, footage, workdir).await?)
    }
}

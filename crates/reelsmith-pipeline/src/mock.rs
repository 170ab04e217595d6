//! Mock stage implementations for deterministic testing.
//!
//! A `MockStages` set succeeds with canned artifacts by default; individual
//! stages can be configured to fail with a specific `StageError`. Invocations
//! are recorded in order so tests can assert which stages ran.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use reelsmith_types::{
    Clip, FootageSet, MediaRef, Narration, PublishResult, QualityTier, RenderedVideo, RunConfig,
    Script, Segment,
};

use crate::error::{Result, StageError};
use crate::stage::{
    FootageStage, NarrationStage, NotifyStage, PublishStage, RenderStage, RunSummary, ScriptStage,
    Stages, SharedStages,
};

// ─────────────────────────────────────────────────────────────────────────────
// Sample artifacts
// ─────────────────────────────────────────────────────────────────────────────

/// A plausible four-segment script totalling roughly one minute.
pub fn sample_script() -> Script {
    Script::new(vec![
        Segment::new("The deep ocean is the largest habitat on Earth.", 14.0),
        Segment::new("Most of it has never been seen by human eyes.", 15.0),
        Segment::new("Creatures there make their own light to survive.", 15.0),
        Segment::new("Every expedition discovers species new to science.", 14.0),
    ])
}

pub fn sample_narration() -> Narration {
    Narration {
        audio: MediaRef::File(PathBuf::from("narration.mp3")),
        duration_secs: 58.5,
    }
}

pub fn sample_footage() -> FootageSet {
    FootageSet::new(vec![
        Clip {
            id: 101,
            url: "https://stock.example.com/ocean-1.mp4".to_string(),
            width: 3840,
            height: 2160,
            duration_secs: 22.0,
            tier: QualityTier::Uhd,
        },
        Clip {
            id: 102,
            url: "https://stock.example.com/ocean-2.mp4".to_string(),
            width: 1920,
            height: 1080,
            duration_secs: 25.0,
            tier: QualityTier::Hd,
        },
        Clip {
            id: 103,
            url: "https://stock.example.com/ocean-3.mp4".to_string(),
            width: 1920,
            height: 1080,
            duration_secs: 18.0,
            tier: QualityTier::Hd,
        },
    ])
}

pub fn sample_video() -> RenderedVideo {
    RenderedVideo {
        video: MediaRef::File(PathBuf::from("output.mp4")),
        duration_secs: 58.5,
    }
}

pub fn sample_publish_result() -> PublishResult {
    PublishResult {
        video_id: "vid-12345".to_string(),
        url: "https://youtu.be/vid-12345".to_string(),
        visibility: "unlisted".to_string(),
        title: "Daily Briefing - 2026-08-28".to_string(),
        description: "Generated on 2026-08-28.".to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MockStages
// ─────────────────────────────────────────────────────────────────────────────

/// Configurable mock implementation of every stage trait.
#[derive(Default)]
pub struct MockStages {
    script_error: Option<StageError>,
    narration_error: Option<StageError>,
    footage_error: Option<StageError>,
    render_error: Option<StageError>,
    publish_error: Option<StageError>,
    notify_error: Option<StageError>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockStages {
    /// Every stage succeeds with the sample artifacts.
    pub fn happy() -> Self {
        Self::default()
    }

    pub fn with_script_error(mut self, err: StageError) -> Self {
        self.script_error = Some(err);
        self
    }

    pub fn with_narration_error(mut self, err: StageError) -> Self {
        self.narration_error = Some(err);
        self
    }

    pub fn with_footage_error(mut self, err: StageError) -> Self {
        self.footage_error = Some(err);
        self
    }

    pub fn with_render_error(mut self, err: StageError) -> Self {
        self.render_error = Some(err);
        self
    }

    pub fn with_publish_error(mut self, err: StageError) -> Self {
        self.publish_error = Some(err);
        self
    }

    pub fn with_notify_error(mut self, err: StageError) -> Self {
        self.notify_error = Some(err);
        self
    }

    /// Stage names in invocation order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, stage: &'static str) {
        self.calls.lock().unwrap().push(stage);
    }

    /// Bundle one shared mock into a full stage set.
    pub fn into_stages(self: Arc<Self>) -> SharedStages {
        Arc::new(Stages {
            script: self.clone(),
            narration: self.clone(),
            footage: self.clone(),
            render: self.clone(),
            publish: self.clone(),
            notify: self,
        })
    }
}

#[async_trait]
impl ScriptStage for MockStages {
    async fn generate(&self, _config: &RunConfig) -> Result<Script> {
        self.record("script");
        match &self.script_error {
            Some(err) => Err(err.clone()),
            None => Ok(sample_script()),
        }
    }
}

#[async_trait]
impl NarrationStage for MockStages {
    async fn synthesize(
        &self,
        _config: &RunConfig,
        _script: &Script,
        workdir: &Path,
    ) -> Result<Narration> {
        self.record("narration");
        match &self.narration_error {
            Some(err) => Err(err.clone()),
            None => {
                let mut narration = sample_narration();
                narration.audio = MediaRef::File(workdir.join("narration.mp3"));
                Ok(narration)
            }
        }
    }
}

#[async_trait]
impl FootageStage for MockStages {
    async fn source(
        &self,
        _config: &RunConfig,
        _script: &Script,
        _narration_secs: f64,
    ) -> Result<FootageSet> {
        self.record("footage");
        match &self.footage_error {
            Some(err) => Err(err.clone()),
            None => Ok(sample_footage()),
        }
    }
}

#[async_trait]
impl RenderStage for MockStages {
    async fn render(
        &self,
        _config: &RunConfig,
        _narration: Narration,
        _footage: FootageSet,
        workdir: &Path,
    ) -> Result<RenderedVideo> {
        self.record("render");
        match &self.render_error {
            Some(err) => Err(err.clone()),
            None => {
                let mut video = sample_video();
                video.video = MediaRef::File(workdir.join("output.mp4"));
                Ok(video)
            }
        }
    }
}

#[async_trait]
impl PublishStage for MockStages {
    async fn publish(&self, _config: &RunConfig, _video: RenderedVideo) -> Result<PublishResult> {
        self.record("publish");
        match &self.publish_error {
            Some(err) => Err(err.clone()),
            None => Ok(sample_publish_result()),
        }
    }
}

#[async_trait]
impl NotifyStage for MockStages {
    async fn notify(&self, _config: &RunConfig, _summary: &RunSummary) -> Result<()> {
        self.record("notify");
        match &self.notify_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RunConfig {
        use reelsmith_types::{Credentials, Preset, Visibility};
        RunConfig {
            topic: "the deep ocean".to_string(),
            duration_secs: 60,
            voice: "narrator-1".to_string(),
            preset: Preset::Facts,
            instructions: String::new(),
            context: String::new(),
            title_template: "T".to_string(),
            description_template: "D".to_string(),
            tags: vec![],
            visibility: Visibility::Unlisted,
            allow_copyrighted_audio: false,
            webhook_url: None,
            credentials: Credentials::default(),
        }
    }

    #[tokio::test]
    async fn test_happy_mock_records_calls() {
        let mock = Arc::new(MockStages::happy());
        let config = test_config();

        let script = mock.generate(&config).await.unwrap();
        assert_eq!(script.segments.len(), 4);

        let narration = mock
            .synthesize(&config, &script, Path::new("/tmp/run"))
            .await
            .unwrap();
        assert!(narration.duration_secs > 0.0);

        assert_eq!(mock.calls(), vec!["script", "narration"]);
    }

    #[tokio::test]
    async fn test_configured_failure() {
        let mock = Arc::new(
            MockStages::happy().with_script_error(StageError::Generation("empty".into())),
        );
        let err = mock.generate(&test_config()).await.unwrap_err();
        assert_eq!(err.kind(), "generation_failure");
    }

    #[test]
    fn test_sample_footage_covers_sample_narration() {
        assert!(sample_footage().total_secs() >= sample_narration().duration_secs);
    }
}

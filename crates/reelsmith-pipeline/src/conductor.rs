//! The pipeline conductor.
//!
//! One conductor instance represents exactly one run: it drives the stages in
//! fixed order, threads artifacts between them, and emits a lazy, ordered,
//! finite sequence of `RunEvent` values. The sequence is pull-driven — event
//! production is paced by real work, and a consumer that stops polling stops
//! the run at the next stage boundary.

use std::path::PathBuf;
use std::pin::Pin;

use chrono::Utc;
use futures::Stream;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use reelsmith_types::{RunConfig, RunEvent};

use crate::error::StageError;
use crate::stage::{RunSummary, SharedStages};

/// A boxed, ordered, finite stream of run events.
pub type RunStream = Pin<Box<dyn Stream<Item = RunEvent> + Send + 'static>>;

/// Drives one run. Cannot be rewound or replayed; construct a new conductor
/// to retry.
pub struct Conductor {
    stages: SharedStages,
    config: RunConfig,
    run_id: Uuid,
    workdir_root: PathBuf,
    cancellation: CancellationToken,
}

impl Conductor {
    /// Create a conductor for one run of the given configuration.
    ///
    /// The configuration is expected to be validated already; the conductor
    /// does not re-run validation.
    pub fn new(stages: SharedStages, config: RunConfig) -> Self {
        Self {
            stages,
            config,
            run_id: Uuid::new_v4(),
            workdir_root: std::env::temp_dir(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Override the parent directory for the run workspace.
    pub fn with_workdir_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workdir_root = root.into();
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Token that cancels the run at the next stage boundary. Dropping the
    /// event stream has the same effect; the token exists for observers that
    /// keep the stream alive but want to stop initiating new work.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Consume the conductor and produce the run's event stream.
    pub fn into_stream(self) -> RunStream {
        let Conductor {
            stages,
            config,
            run_id,
            workdir_root,
            cancellation,
        } = self;

        Box::pin(async_stream::stream! {
            let workdir = workdir_root.join(format!("reelsmith-{}", run_id));

            tracing::info!(run_id = %run_id, topic = %config.topic, "run started");

            // ── Script ───────────────────────────────────────────────────
            if cancellation.is_cancelled() { return; }
            yield RunEvent::info("Generating script");

            let script = match stages.script.generate(&config).await {
                Ok(script) => script,
                Err(e) => {
                    yield failure_event(run_id, "script", &e);
                    return;
                }
            };
            yield RunEvent::progress("Script ready")
                .with_detail(format!("{} segments", script.segments.len()))
                .with_meta(json!({
                    "segments": script.segments.len(),
                    "estimated_secs": script.estimated_secs(),
                }));

            // Workspace is only needed from here on.
            if let Err(e) = std::fs::create_dir_all(&workdir) {
                let err = StageError::Workspace(format!(
                    "failed to create {}: {}",
                    workdir.display(),
                    e
                ));
                yield failure_event(run_id, "workspace", &err);
                return;
            }

            // ── Narration ────────────────────────────────────────────────
            if cancellation.is_cancelled() { return; }
            yield RunEvent::info("Synthesizing narration");

            let narration = match stages
                .narration
                .synthesize(&config, &script, &workdir)
                .await
            {
                Ok(narration) => narration,
                Err(e) => {
                    yield failure_event(run_id, "narration", &e);
                    return;
                }
            };
            yield RunEvent::progress("Narration ready")
                .with_detail(format!("{:.1}s", narration.duration_secs))
                .with_meta(json!({"duration_secs": narration.duration_secs}));

            // ── Footage ──────────────────────────────────────────────────
            if cancellation.is_cancelled() { return; }
            yield RunEvent::info("Sourcing footage");

            let footage = match stages
                .footage
                .source(&config, &script, narration.duration_secs)
                .await
            {
                Ok(footage) => footage,
                Err(e) => {
                    yield failure_event(run_id, "footage", &e);
                    return;
                }
            };
            yield RunEvent::progress("Footage ready")
                .with_detail(format!("{} clips", footage.clips.len()))
                .with_meta(json!({
                    "clips": footage.clips.len(),
                    "total_secs": footage.total_secs(),
                }));

            // ── Render ───────────────────────────────────────────────────
            if cancellation.is_cancelled() { return; }
            yield RunEvent::info("Rendering video");

            let video = match stages
                .render
                .render(&config, narration, footage, &workdir)
                .await
            {
                Ok(video) => video,
                Err(e) => {
                    yield failure_event(run_id, "render", &e);
                    return;
                }
            };
            yield RunEvent::progress("Render complete")
                .with_detail(format!("{:.1}s", video.duration_secs))
                .with_meta(json!({"duration_secs": video.duration_secs}));

            // ── Publish ──────────────────────────────────────────────────
            if cancellation.is_cancelled() { return; }
            yield RunEvent::uploading("Uploading video");

            let result = match stages.publish.publish(&config, video).await {
                Ok(result) => result,
                Err(e) => {
                    yield failure_event(run_id, "publish", &e);
                    return;
                }
            };

            // ── Notify ───────────────────────────────────────────────────
            // The deliverable exists; a notify failure is reported but never
            // changes the run outcome.
            let summary = RunSummary {
                run_id,
                topic: config.topic.clone(),
                result: result.clone(),
                completed_at: Utc::now(),
            };
            if let Err(e) = stages.notify.notify(&config, &summary).await {
                tracing::warn!(run_id = %run_id, error = %e, "webhook delivery failed");
                yield RunEvent::error("Webhook delivery failed")
                    .with_detail(e.to_string())
                    .with_meta(json!({"stage": "notify", "kind": e.kind()}));
            }

            let _ = std::fs::remove_dir_all(&workdir);

            tracing::info!(run_id = %run_id, url = %result.url, "run complete");
            yield RunEvent::success("Run complete").with_meta(json!({
                "video_id": result.video_id,
                "url": result.url,
                "title": result.title,
                "visibility": result.visibility,
            }));
        })
    }
}

/// Terminal error event for a failed stage. Nothing follows it.
fn failure_event(run_id: Uuid, stage: &str, err: &StageError) -> RunEvent {
    tracing::error!(run_id = %run_id, stage, kind = err.kind(), error = %err, "stage failed");
    RunEvent::error(format!("{} stage failed", capitalize(stage)))
        .with_detail(err.to_string())
        .with_meta(json!({"stage": stage, "kind": err.kind()}))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("script"), "Script");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_failure_event_shape() {
        let err = StageError::Auth("refresh token expired".into());
        let event = failure_event(Uuid::new_v4(), "publish", &err);
        assert_eq!(event.title, "Publish stage failed");
        let meta = event.meta.unwrap();
        assert_eq!(meta["stage"], "publish");
        assert_eq!(meta["kind"], "auth_failure");
        assert!(event.detail.unwrap().contains("refresh token expired"));
    }
}

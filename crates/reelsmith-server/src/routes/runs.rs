//! Run trigger endpoints.
//!
//! Two entry points into the same pipeline: an interactive one taking a run
//! payload and streaming progress over SSE, and an unattended one deriving
//! everything from environment defaults and returning the full event trail in
//! one document. Both overlay onto the same defaults and go through the same
//! validation routine.

use std::convert::Infallible;

use axum::{
    Json,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde::Deserialize;
use tracing::info;

use reelsmith_pipeline::{Conductor, DEFAULT_PUSH_CAPACITY, RunReport, collect_run, push_run};
use reelsmith_types::{Credentials, Preset, RunConfig, Visibility};

use crate::error::ServerError;
use crate::state::AppState;

/// Sentinel message closing every SSE run stream.
pub const DONE_SENTINEL: &str = "[DONE]";

// ─────────────────────────────────────────────────────────────────────────────
// Request types
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for the interactive run endpoint.
///
/// Every field is optional; missing fields take the environment-derived
/// default, so a caller only states what it wants to change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub preset: Option<Preset>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub title_template: Option<String>,
    #[serde(default)]
    pub description_template: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub allow_copyrighted_audio: Option<bool>,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

impl RunRequest {
    /// Overlay this request onto the defaults.
    pub fn apply_to(self, mut config: RunConfig) -> RunConfig {
        if let Some(topic) = self.topic {
            config.topic = topic;
        }
        if let Some(duration_secs) = self.duration_secs {
            config.duration_secs = duration_secs;
        }
        if let Some(voice) = self.voice {
            config.voice = voice;
        }
        if let Some(preset) = self.preset {
            config.preset = preset;
        }
        if let Some(instructions) = self.instructions {
            config.instructions = instructions;
        }
        if let Some(context) = self.context {
            config.context = context;
        }
        if let Some(title_template) = self.title_template {
            config.title_template = title_template;
        }
        if let Some(description_template) = self.description_template {
            config.description_template = description_template;
        }
        if let Some(tags) = self.tags {
            config.tags = tags;
        }
        if let Some(visibility) = self.visibility {
            config.visibility = visibility;
        }
        if let Some(allow) = self.allow_copyrighted_audio {
            config.allow_copyrighted_audio = allow;
        }
        if let Some(webhook_url) = self.webhook_url {
            config.webhook_url = Some(webhook_url);
        }
        if let Some(credentials) = self.credentials {
            config.credentials = merge_credentials(config.credentials, credentials);
        }
        config
    }
}

/// Overlay explicit credentials onto the defaults, field by field, so a caller
/// can supply only the keys it wants to replace.
fn merge_credentials(defaults: Credentials, explicit: Credentials) -> Credentials {
    let pick = |explicit: String, default: String| {
        if explicit.trim().is_empty() {
            default
        } else {
            explicit
        }
    };
    Credentials {
        text_api_key: pick(explicit.text_api_key, defaults.text_api_key),
        voice_api_key: pick(explicit.voice_api_key, defaults.voice_api_key),
        footage_api_key: pick(explicit.footage_api_key, defaults.footage_api_key),
        upload_client_id: pick(explicit.upload_client_id, defaults.upload_client_id),
        upload_client_secret: pick(explicit.upload_client_secret, defaults.upload_client_secret),
        upload_refresh_token: pick(explicit.upload_refresh_token, defaults.upload_refresh_token),
    }
}

/// Environment-derived defaults, unless the server configuration pins them.
fn run_defaults(state: &AppState) -> Result<RunConfig, ServerError> {
    match &state.config().run_defaults {
        Some(defaults) => Ok(defaults.clone()),
        None => Ok(reelsmith_config::from_env()?),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/runs - interactive run with SSE progress.
///
/// One JSON-encoded `RunEvent` per SSE message, closed by a `[DONE]` sentinel.
/// Disconnecting mid-stream cancels the run at the next stage boundary.
pub async fn start_run_handler(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
    let config = request.apply_to(run_defaults(&state)?);
    config.validate().map_err(ServerError::Validation)?;

    let conductor = Conductor::new(state.stages.clone(), config);
    let run_id = conductor.run_id();
    info!(run_id = %run_id, "interactive run accepted");

    let events = push_run(conductor.into_stream(), DEFAULT_PUSH_CAPACITY);

    let sse_stream = async_stream::stream! {
        use futures::StreamExt;

        let mut events = std::pin::pin!(events);
        while let Some(event) = events.next().await {
            match serde_json::to_string(&event) {
                Ok(json) => yield Ok(Event::default().data(json)),
                Err(e) => {
                    tracing::error!(run_id = %run_id, error = %e, "event serialization failed");
                }
            }
        }
        yield Ok(Event::default().data(DONE_SENTINEL));
    };

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::default()))
}

/// POST /api/v1/runs/cron - unattended run from environment defaults.
///
/// No request body; blocks until the run finishes and returns the full
/// ordered event trail with an overall `ok` flag.
pub async fn cron_run_handler(
    State(state): State<AppState>,
) -> Result<Json<RunReport>, ServerError> {
    let config = run_defaults(&state)?;
    config.validate().map_err(ServerError::Validation)?;

    let conductor = Conductor::new(state.stages.clone(), config);
    let run_id = conductor.run_id();
    info!(run_id = %run_id, "unattended run accepted");

    let report = collect_run(run_id, conductor.into_stream()).await;
    Ok(Json(report))
}

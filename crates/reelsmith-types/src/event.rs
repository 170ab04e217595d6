//! Progress events emitted during a run.
//!
//! Events are strictly chronologically ordered within a run; the transports
//! never reorder or deduplicate them. A run's sequence ends with exactly one
//! terminal event: `success` or a halting `error`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of one run event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Info,
    Progress,
    Uploading,
    Success,
    Error,
}

/// One observable progress/status notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    /// Unique event id.
    pub id: Uuid,

    pub status: EventStatus,

    /// Short human-readable title.
    pub title: String,

    /// Optional free-text detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    pub timestamp: DateTime<Utc>,

    /// Optional structured metadata (clip counts, published URL, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl RunEvent {
    fn new(status: EventStatus, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            status,
            title: title.into(),
            detail: None,
            timestamp: Utc::now(),
            meta: None,
        }
    }

    /// Create an `info` event announcing a stage.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(EventStatus::Info, title)
    }

    /// Create a `progress` event summarizing a stage result.
    pub fn progress(title: impl Into<String>) -> Self {
        Self::new(EventStatus::Progress, title)
    }

    /// Create an `uploading` event.
    pub fn uploading(title: impl Into<String>) -> Self {
        Self::new(EventStatus::Uploading, title)
    }

    /// Create a `success` event.
    pub fn success(title: impl Into<String>) -> Self {
        Self::new(EventStatus::Success, title)
    }

    /// Create an `error` event.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(EventStatus::Error, title)
    }

    /// Attach a detail string.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach structured metadata.
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

//! Artifacts produced and consumed by pipeline stages.
//!
//! Each artifact is owned by the stage that produced it until the conductor
//! hands it to the next stage; hand-off is a transfer of exclusive ownership.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Script
// ─────────────────────────────────────────────────────────────────────────────

/// One narration segment of the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// The text to be spoken.
    pub text: String,
    /// Approximate spoken duration, estimated from word count.
    pub estimated_secs: f64,
}

impl Segment {
    pub fn new(text: impl Into<String>, estimated_secs: f64) -> Self {
        Self {
            text: text.into(),
            estimated_secs,
        }
    }
}

/// Ordered narration segments produced by the script stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub segments: Vec<Segment>,
}

impl Script {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of the per-segment duration estimates.
    pub fn estimated_secs(&self) -> f64 {
        self.segments.iter().map(|s| s.estimated_secs).sum()
    }

    /// Full narration text, segments joined by a single space.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Media references
// ─────────────────────────────────────────────────────────────────────────────

/// Reference to a media payload: a file in the run workspace or a durable URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MediaRef {
    File(PathBuf),
    Url(String),
}

impl MediaRef {
    /// The local path, if this reference points at a file.
    pub fn as_path(&self) -> Option<&std::path::Path> {
        match self {
            MediaRef::File(path) => Some(path),
            MediaRef::Url(_) => None,
        }
    }
}

/// The narration audio artifact with its measured (not estimated) duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narration {
    pub audio: MediaRef,
    pub duration_secs: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Footage
// ─────────────────────────────────────────────────────────────────────────────

/// Resolution tier of a sourced clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Sd,
    Hd,
    Uhd,
}

impl QualityTier {
    /// Classify a clip by its vertical resolution.
    pub fn from_height(height: u32) -> Self {
        if height >= 2160 {
            QualityTier::Uhd
        } else if height >= 1080 {
            QualityTier::Hd
        } else {
            QualityTier::Sd
        }
    }
}

/// One sourced stock clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Provider id, used to avoid selecting the same clip twice.
    pub id: u64,
    /// Direct download URL for the clip file.
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub duration_secs: f64,
    pub tier: QualityTier,
}

/// Ordered clips covering the narration.
///
/// Invariant: `total_secs() >= narration duration` — the footage stage fails
/// rather than returning an undersized set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootageSet {
    pub clips: Vec<Clip>,
}

impl FootageSet {
    pub fn new(clips: Vec<Clip>) -> Self {
        Self { clips }
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn total_secs(&self) -> f64 {
        self.clips.iter().map(|c| c.duration_secs).sum()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Render & publish
// ─────────────────────────────────────────────────────────────────────────────

/// The merged media artifact produced by the render stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedVideo {
    pub video: MediaRef,
    pub duration_secs: f64,
}

/// Durable result of the publish stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishResult {
    /// Platform video id.
    pub video_id: String,
    /// Public watch URL.
    pub url: String,
    /// Visibility actually applied by the platform.
    pub visibility: String,
    /// Final title after template expansion.
    pub title: String,
    /// Final description after template expansion.
    pub description: String,
}

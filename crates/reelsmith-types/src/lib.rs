//! Shared data model for the Reelsmith production pipeline.
//!
//! This crate holds the plain data types that flow between pipeline stages:
//! the run configuration, the artifacts each stage produces, and the progress
//! events a run emits. No I/O lives here.

pub mod artifact;
pub mod config;
pub mod event;

pub use artifact::{
    Clip, FootageSet, MediaRef, Narration, PublishResult, QualityTier, RenderedVideo, Script,
    Segment,
};
pub use config::{Credentials, FieldError, Preset, RunConfig, Visibility};
pub use event::{EventStatus, RunEvent};

//! Orchestration core for Reelsmith runs.
//!
//! This crate holds the stage contracts, the conductor that sequences them,
//! the stage failure taxonomy, and the two event-transport drivers (push and
//! collect). Stage implementations live in their own crates; mocks for
//! deterministic testing live in [`mock`].

pub mod conductor;
pub mod error;
pub mod mock;
pub mod stage;
pub mod transport;

pub use conductor::{Conductor, RunStream};
pub use error::{Result, StageError};
pub use stage::{
    FootageStage, NarrationStage, NotifyStage, PublishStage, RenderStage, RunSummary, ScriptStage,
    Stages, SharedStages,
};
pub use transport::{DEFAULT_PUSH_CAPACITY, RunReport, collect_run, push_run};

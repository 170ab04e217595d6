//! Shared application state.

use std::sync::Arc;

use reelsmith_pipeline::SharedStages;

use crate::config::ServerConfig;

/// State shared across handlers. Cheap to clone; the stages themselves hold no
/// per-run state, so concurrent runs are fully isolated.
#[derive(Clone)]
pub struct AppState {
    /// Stage implementations driving every run.
    pub stages: SharedStages,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Create new application state.
    pub fn new(stages: SharedStages, config: ServerConfig) -> Self {
        Self {
            stages,
            config: Arc::new(config),
        }
    }

    /// Access the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

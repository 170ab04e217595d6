//! HTTP trigger and progress surface for Reelsmith runs.
//!
//! Two entry points over one pipeline: an interactive run endpoint streaming
//! progress via SSE, and an unattended cron endpoint returning the full event
//! trail in one JSON document. Bearer-token authentication guards both.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use auth::{AuthError, auth_middleware};
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use routes::RunRequest;
pub use state::AppState;

use std::sync::Arc;

use axum::{Router, middleware};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use reelsmith_pipeline::{SharedStages, Stages};

/// Assemble the production stage set from the default service clients.
pub fn production_stages() -> Result<SharedStages> {
    let config_err = |e: String| ServerError::Config(e);

    Ok(Arc::new(Stages {
        script: Arc::new(
            reelsmith_script::ScriptGenerator::new(reelsmith_script::ChatConfig::default())
                .map_err(|e| config_err(e.to_string()))?,
        ),
        narration: Arc::new(
            reelsmith_voice::VoiceSynthesizer::new(reelsmith_voice::SpeechConfig::default())
                .map_err(|e| config_err(e.to_string()))?,
        ),
        footage: Arc::new(
            reelsmith_footage::FootageSourcer::new(reelsmith_footage::StockConfig::default())
                .map_err(|e| config_err(e.to_string()))?,
        ),
        render: Arc::new(reelsmith_media::VideoRenderer::new()),
        publish: Arc::new(
            reelsmith_publish::VideoPublisher::new(reelsmith_publish::PublishConfig::default())
                .map_err(|e| config_err(e.to_string()))?,
        ),
        notify: Arc::new(
            reelsmith_webhook::WebhookNotifier::new().map_err(|e| config_err(e.to_string()))?,
        ),
    }))
}

/// The Reelsmith HTTP server.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given stages and configuration.
    pub fn new(stages: SharedStages, config: ServerConfig) -> Self {
        Self {
            state: AppState::new(stages, config),
        }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        Router::new()
            // Health route, no auth required
            .merge(routes::health_routes())
            .nest("/api/v1", self.api_routes())
            .layer(middleware::from_fn(logging::request_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// API routes (v1). All require authentication.
    fn api_routes(&self) -> Router<AppState> {
        use axum::routing::post;

        Router::new()
            .route("/runs", post(routes::start_run_handler))
            .route("/runs/cron", post(routes::cron_run_handler))
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth::auth_middleware,
            ))
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config().bind_address;
        let router = self.router();

        info!("Starting server on {}", addr);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use reelsmith_pipeline::mock::MockStages;
    use tower::ServiceExt;

    fn test_server(auth_token: Option<&str>) -> Server {
        let stages = Arc::new(MockStages::happy()).into_stages();
        Server::new(stages, ServerConfig::new(auth_token.map(str::to_string)))
    }

    #[tokio::test]
    async fn test_health_endpoint_requires_no_auth() {
        let app = test_server(Some("secret")).router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_api_routes_require_auth() {
        let app = test_server(Some("secret")).router();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/runs")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

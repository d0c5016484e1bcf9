//! HTTP API server, the gateway's presentation boundary
//!
//! The interactive UI is an external client of this API. One intent runs
//! at a time: the orchestrator sits behind an async mutex, matching the
//! single-logical-thread event model of an interactive surface.

pub mod assist;
pub mod health;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::orchestrator::Orchestrator;
use crate::Result;

/// Shared state for API handlers
pub struct ApiState {
    /// The session orchestrator; the mutex serializes intents
    pub orchestrator: Mutex<Orchestrator>,

    /// Whether spoken narration is configured
    pub narration_enabled: bool,

    /// Whether the vision service has a credential
    pub vision_configured: bool,

    /// Vision model identifier, for the status endpoint
    pub vision_model: String,
}

/// HTTP API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a server for the given state and port
    #[must_use]
    pub const fn new(state: Arc<ApiState>, port: u16) -> Self {
        Self { state, port }
    }

    /// Build the full router
    #[must_use]
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .nest("/api", assist::router(self.state.clone()))
            .merge(health::router())
            .merge(health::status_router(self.state.clone()))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("127.0.0.1:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}

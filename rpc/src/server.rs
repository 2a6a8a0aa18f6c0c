//! Axum-based HTTP server.

use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tracing::info;

use scrutin_election::ElectionCoordinator;

use crate::handlers;

/// Shared state for the HTTP server.
pub struct AppState {
    pub coordinator: ElectionCoordinator,
}

/// The HTTP server, configured with a port and shared state.
pub struct RpcServer {
    pub port: u16,
    pub state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(port: u16, coordinator: ElectionCoordinator) -> Self {
        Self {
            port,
            state: Arc::new(AppState { coordinator }),
        }
    }

    /// Build the application router.
    ///
    /// `/elections/latest-winner` is registered alongside `/elections/:id`;
    /// axum prefers the static segment, so "latest-winner" is never parsed
    /// as an election id.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/elections", post(handlers::create_election))
            .route("/elections/latest-winner", get(handlers::latest_winner))
            .route("/elections/:id", get(handlers::get_election))
            .route("/elections/:id/candidates", post(handlers::add_candidate))
            .route("/elections/:id/start", put(handlers::start_election))
            .route("/elections/:id/stop", put(handlers::stop_election))
            .route("/elections/:id/vote", post(handlers::cast_vote))
            .route("/elections/:id/results", get(handlers::get_results))
            .with_state(self.state.clone())
    }

    /// Start serving. Runs until the server is shut down.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let app = self.router();
        let addr = format!("0.0.0.0:{}", self.port);
        info!("HTTP server listening on {}", addr);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}

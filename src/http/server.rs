//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::GritConfig;
use crate::http::handlers::{self, AppState};
use crate::lifecycle::Shutdown;
use crate::session::GoalSession;

/// HTTP front end for a goal session.
pub struct GritServer {
    router: Router,
}

impl GritServer {
    pub fn new(config: &GritConfig, session: Arc<GoalSession>) -> Self {
        let state = AppState::new(session, &config.display.date_format);
        let router = build_router(state, Duration::from_secs(config.http.request_timeout_secs));
        Self { router }
    }

    /// Run the server on `listener` until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut stop = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/account", get(handlers::get_account))
        .route("/api/wallet/connect", post(handlers::connect_wallet))
        .route("/api/goals", get(handlers::list_goals).post(handlers::mint_goal))
        .route("/api/goals/refresh", post(handlers::refresh_goals))
        .route("/api/goals/{token_id}/achieve", post(handlers::achieve_goal))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the liveness handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve on a bound listener until shutdown is broadcast

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::health::LivenessProbe;
use crate::http::handlers::{healthcheck, healthz};

/// Headroom on top of the upstream timeout before a request is cut off.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub probe: LivenessProbe,
}

/// HTTP server for the liveness endpoints.
pub struct HttpServer {
    router: Router,
    config: Arc<Config>,
}

impl HttpServer {
    /// Create a new HTTP server around an already-wired probe.
    pub fn new(config: Arc<Config>, probe: LivenessProbe) -> Self {
        let state = AppState { probe };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &Config, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(healthz))
            .route("/healthcheck", get(healthcheck))
            .with_state(state)
            .layer(TimeoutLayer::new(config.request_timeout + REQUEST_TIMEOUT_SLACK))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for serving in-process (tests).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal is received.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            joke_chance = self.config.joke_chance_percent,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

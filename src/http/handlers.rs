//! Liveness handlers.

use std::future::Future;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;

const TEXT_PLAIN: [(header::HeaderName, &str); 1] = [(header::CONTENT_TYPE, "text/plain")];

/// `GET /healthz`: human-facing, `pong!` or a joke.
pub async fn healthz(State(state): State<AppState>) -> Response {
    let line = state.probe.respond().await;
    (StatusCode::OK, TEXT_PLAIN, format!("{}\n", line)).into_response()
}

/// `GET /healthcheck`: machine-facing, `ok` whenever the probe completes.
pub async fn healthcheck(State(state): State<AppState>) -> Response {
    let probe = state.probe.clone();
    run_check(async move { probe.respond().await }).await
}

/// Run one check on its own task so that a panic inside it surfaces as a
/// 503 instead of a dropped connection.
async fn run_check<F>(check: F) -> Response
where
    F: Future<Output = String> + Send + 'static,
{
    match tokio::spawn(check).await {
        Ok(line) => {
            tracing::debug!(probe_response = %line, "Healthcheck passed");
            (StatusCode::OK, TEXT_PLAIN, "ok\n").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Healthcheck probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, TEXT_PLAIN, "healthz failed\n").into_response()
        }
    }
}

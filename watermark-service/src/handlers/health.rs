use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "watermark-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness probe. The logo is loaded before the listener starts, so a
/// running instance can always compose.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let logo = state.compositor.logo();
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "logo": { "width": logo.width(), "height": logo.height() }
        })),
    )
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

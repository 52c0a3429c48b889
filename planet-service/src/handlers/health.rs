use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::startup::AppState;

/// Liveness probe: the process is up.
pub async fn liveness() -> impl IntoResponse {
    Json(json!({ "status": "live" }))
}

/// Readiness probe. Constant; store health is reported by `/health`.
pub async fn readiness() -> impl IntoResponse {
    Json(json!({ "status": "ready" }))
}

/// Dependency-aware health check that pings the record store.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "planet-service",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": "planet-service",
                    "error": e.to_string()
                })),
            )
        }
    }
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        service_core::middleware::metrics::render_metrics(),
    )
}

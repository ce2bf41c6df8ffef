//! Health endpoints for load balancers and deploy probes.

use axum::response::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/live
///
/// Liveness is intentionally trivial: if the process answers, it is alive.
pub async fn liveness() -> &'static str {
    "OK"
}

//! Health check endpoints.

use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde::Serialize;
use zeno_core::lead::timestamp;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always true.
    pub ok: bool,
    /// Service status.
    pub status: &'static str,
    /// Current UTC time.
    pub timestamp: String,
    /// Service version.
    pub version: &'static str,
}

/// Liveness response.
#[derive(Serialize)]
pub struct PingResponse {
    /// Always true.
    pub ok: bool,
    /// Always true.
    pub pong: bool,
}

/// Health check handler.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        status: "healthy",
        timestamp: timestamp(Utc::now()),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn ping() -> Json<PingResponse> {
    Json(PingResponse { ok: true, pong: true })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ping", get(ping))
}

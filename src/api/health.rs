//! Health check endpoint.

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: i64,
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "meta"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (Utc::now() - state.startup_time).num_seconds(),
    })
}

/// Build health routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness response, reports the number of feed threads as a store check
#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub top_level_threads: u64,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/ready - fails with 500 when the store is unreachable
async fn ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>, ApiError> {
    let top_level_threads = state
        .store()
        .count_top_level_threads()
        .await
        .map_err(|e| threadline_core::Error::storage("check storage", e))?;

    Ok(Json(ReadyResponse {
        status: "ready",
        top_level_threads,
    }))
}

/// Health routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
}

//! Health check endpoints for container orchestration.
//!
//! `/health` is a process liveness probe. `/health/store` runs the same
//! backing store probe a pick does, for readiness checks.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use crate::state::AppState;

/// Health check handler.
///
/// Returns a simple "ok" response to indicate the service is running.
/// This only checks that the process can respond to HTTP.
pub async fn health() -> &'static str {
    "ok"
}

/// Backing store readiness handler.
#[instrument(name = "health::store", skip(state))]
pub async fn store(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.picker.check_liveness().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "backing store unavailable"),
    }
}

//! Song API handlers.
//!
//! `pick_random_song` is the server function the home page button calls.

use axum::{extract::State, Extension, Json};
use tracing::instrument;

use crate::catalog::SongRecord;
use crate::error::{ApiErrorResponse, ResultExt};
use crate::middleware::{CurrentUser, RequestId};
use crate::state::AppState;

/// Probe the backing store and return one random song.
///
/// The request body is ignored. Fails with 503 when the store is unavailable
/// and 500 when the catalog is empty.
#[instrument(
    name = "songs::pick_random_song",
    skip(state, request_id, current_user),
    fields(identity = %current_user.name())
)]
pub async fn pick_random_song(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<SongRecord>, ApiErrorResponse> {
    let song = state
        .picker
        .pick_random_song()
        .await
        .with_api_request_id(&request_id)?;
    Ok(Json(song))
}

/// The full catalog in order.
pub async fn list(State(state): State<AppState>) -> Json<Vec<SongRecord>> {
    Json(state.picker.catalog().songs().to_vec())
}

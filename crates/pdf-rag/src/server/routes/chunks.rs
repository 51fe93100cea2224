//! Index inspection endpoint

use axum::{extract::State, Json};

use crate::server::state::AppState;
use crate::types::ChunksResponse;

/// GET /chunks - Dump all stored chunks in insertion order
pub async fn list_chunks(State(state): State<AppState>) -> Json<ChunksResponse> {
    Json(ChunksResponse::from(state.index().chunks()))
}

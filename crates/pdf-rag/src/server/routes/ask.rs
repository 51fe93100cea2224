//! Question answering endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{AskQuery, AskResponse};

/// POST /ask?question=... - Answer a question from the indexed document
pub async fn ask(
    State(state): State<AppState>,
    Query(query): Query<AskQuery>,
) -> Result<Json<AskResponse>> {
    let answer = state.answerer().answer(&query.question).await?;
    Ok(Json(AskResponse { answer }))
}

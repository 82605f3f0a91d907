use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use clarity_engine::RankedResult;
use clarity_types::api::AskRequest;
use clarity_types::events::StreamEvent;

use crate::error::{ApiError, join_error};
use crate::state::AppState;

/// Answer a question from the current message snapshot, then pulse the
/// sources it used to every stream client.
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<RankedResult>, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::InvalidJson)?;

    let question = req
        .question
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::MissingQuestion)?;
    let max_age_hours = req.max_age_hours.unwrap_or(state.default_max_age_hours);

    // Snapshot and rank on the blocking pool; the store lock is released
    // before ranking starts.
    let db = state.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<RankedResult, ApiError> {
        let snapshot = db.db.all_messages()?;
        Ok(clarity_engine::answer(
            &question,
            &snapshot,
            chrono::Utc::now(),
            max_age_hours,
        )?)
    })
    .await
    .map_err(join_error)??;

    let source_ids = result.source_ids();
    info!(
        sources = source_ids.len(),
        confidence = ?result.confidence,
        max_age_hours,
        "answered ask"
    );

    state
        .dispatcher
        .broadcast(StreamEvent::Pulse { source_ids });

    Ok(Json(result))
}

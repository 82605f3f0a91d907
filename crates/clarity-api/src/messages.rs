use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use clarity_types::api::PostMessageRequest;
use clarity_types::events::StreamEvent;

use crate::error::{ApiError, join_error};
use crate::state::AppState;

pub async fn post_message(
    State(state): State<AppState>,
    payload: Result<Json<PostMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::InvalidJson)?;

    let text = req.text.as_deref().map(str::trim).unwrap_or_default().to_string();
    let (Some(channel), Some(user)) = (non_empty(req.channel), non_empty(req.user)) else {
        return Err(ApiError::MissingMessageFields);
    };
    if text.is_empty() {
        return Err(ApiError::MissingMessageFields);
    }
    let pinned = req.pinned;

    // Run blocking DB insert off the async runtime
    let db = state.clone();
    let message = tokio::task::spawn_blocking(move || {
        db.db
            .insert_message(&channel, &user, &text, pinned, chrono::Utc::now())
    })
    .await
    .map_err(join_error)??;

    info!(id = message.id, channel = %message.channel, pinned, "message appended");

    // Broadcast to all stream clients
    state
        .dispatcher
        .broadcast(StreamEvent::MessageCreate(message.clone()));

    Ok((StatusCode::CREATED, Json(message)))
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

use axum::{Json, extract::State};

use clarity_types::api::StateResponse;

use crate::error::{ApiError, join_error};
use crate::state::AppState;

/// How many of the latest messages the state endpoint returns.
const STATE_MESSAGE_LIMIT: u32 = 200;

pub async fn get_state(State(state): State<AppState>) -> Result<Json<StateResponse>, ApiError> {
    // Run blocking DB queries off the async runtime
    let db = state.clone();
    let response = tokio::task::spawn_blocking(move || -> anyhow::Result<StateResponse> {
        Ok(StateResponse {
            channels: db.db.list_channels()?,
            messages: db.db.recent_messages(STATE_MESSAGE_LIMIT)?,
        })
    })
    .await
    .map_err(join_error)??;

    Ok(Json(response))
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use clarity_engine::EngineError;
use clarity_types::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Missing text/channel/user")]
    MissingMessageFields,

    #[error("Missing question")]
    MissingQuestion,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson | Self::MissingMessageFields | Self::MissingQuestion => {
                StatusCode::BAD_REQUEST
            }
            Self::Engine(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Engine(e) => error!("engine rejected snapshot: {}", e),
            Self::Internal(e) => error!("request failed: {:#}", e),
            _ => {}
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Map a failed `spawn_blocking` join into a 500.
pub(crate) fn join_error(e: tokio::task::JoinError) -> ApiError {
    ApiError::Internal(anyhow::Error::new(e).context("spawn_blocking join error"))
}

pub mod ask;
pub mod error;
pub mod messages;
pub mod state;
pub mod workspace;

use axum::{
    Router,
    routing::{get, post},
};

pub use state::{AppState, AppStateInner};

/// JSON routes of the service. The stream socket and static files are
/// mounted by the server binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/state", get(workspace::get_state))
        .route("/api/messages", post(messages::post_message))
        .route("/api/ask", post(ask::ask))
        .with_state(state)
}

//! Route definitions for the prompt history.

use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// History routes mounted at `/history`.
///
/// ```text
/// GET    /          -> list_history
/// POST   /          -> create_history_record
/// DELETE /          -> clear_history
/// GET    /status    -> history_status
/// GET    /{id}      -> get_history_record
/// DELETE /{id}      -> delete_history_record
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(history::list_history)
                .post(history::create_history_record)
                .delete(history::clear_history),
        )
        .route("/status", get(history::history_status))
        .route(
            "/{id}",
            get(history::get_history_record).delete(history::delete_history_record),
        )
}

pub mod generate;
pub mod health;
pub mod history;
pub mod platforms;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate                 stateless generation proxy (POST)
///
/// /platforms                list target platforms (GET)
///
/// /history                  list (GET), generate and record (POST), clear (DELETE)
/// /history/status           pending flag and counts (GET)
/// /history/{id}             get (GET), remove (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/generate", generate::router())
        .nest("/platforms", platforms::router())
        .nest("/history", history::router())
}

use axum::routing::post;
use axum::Router;

use crate::handlers::generate;
use crate::state::AppState;

/// Generation route mounted at `/generate`.
///
/// ```text
/// POST /  -> generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(generate::generate))
}

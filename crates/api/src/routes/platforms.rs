use axum::routing::get;
use axum::Router;

use crate::handlers::platforms;
use crate::state::AppState;

/// Platform catalogue mounted at `/platforms`.
///
/// ```text
/// GET /  -> list_platforms
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(platforms::list_platforms))
}

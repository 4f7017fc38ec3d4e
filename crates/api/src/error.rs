use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use promptcraft_core::error::{codes, CoreError, GenerationError};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`GenerationError`] for upstream
/// failures. Implements [`IntoResponse`] to produce consistent
/// `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `promptcraft_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed call to the generation service.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    codes::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, codes::VALIDATION_ERROR, msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        codes::INTERNAL_ERROR,
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Upstream generation errors ---
            AppError::Generation(err) => classify_generation_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, codes::BAD_REQUEST, msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a generation failure into an HTTP status, error code, and message.
///
/// - `ContentBlocked` maps to 422 with the policy reason as the message.
/// - `RemoteRejected` maps to 429 when the upstream was rate limited, 502 otherwise.
/// - `EmptyResponse` maps to 502.
/// - `Transport` maps to 503 with a sanitized message.
fn classify_generation_error(err: &GenerationError) -> (StatusCode, &'static str, String) {
    let code = err.code();
    match err {
        GenerationError::ContentBlocked(reason) => {
            (StatusCode::UNPROCESSABLE_ENTITY, code, reason.clone())
        }
        GenerationError::RemoteRejected { status, message } => {
            tracing::warn!(upstream_status = status, message = ?message, "Upstream rejected generation");
            let http_status = if *status == StatusCode::TOO_MANY_REQUESTS.as_u16() {
                StatusCode::TOO_MANY_REQUESTS
            } else {
                StatusCode::BAD_GATEWAY
            };
            let message = message
                .clone()
                .unwrap_or_else(|| "Generation service rejected the request".to_string());
            (http_status, code, message)
        }
        GenerationError::EmptyResponse => (StatusCode::BAD_GATEWAY, code, err.to_string()),
        GenerationError::Transport(detail) => {
            tracing::error!(error = %detail, "Generation service unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                code,
                "Generation service is unreachable".to_string(),
            )
        }
    }
}

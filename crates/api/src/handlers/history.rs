//! Handlers for the prompt history.
//!
//! Generation through these endpoints goes via the
//! [`HistoryController`](promptcraft_history::HistoryController), so every
//! successful call is recorded and the pending count is observable.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use promptcraft_core::error::CoreError;
use promptcraft_core::params::PromptParams;
use promptcraft_core::types::RecordId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryStatus {
    pub pending: bool,
    pub capacity: usize,
    pub count: usize,
}

/// GET /api/v1/history
///
/// List records, newest first.
pub async fn list_history(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.history.history(),
    }))
}

/// POST /api/v1/history
///
/// Generate a prompt and record it. Returns 201 with the new record.
pub async fn create_history_record(
    State(state): State<AppState>,
    payload: Result<Json<PromptParams>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(params) = payload?;
    params.validate()?;

    let record = state.history.request_generation(params).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/history/status
pub async fn history_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: HistoryStatus {
            pending: state.history.is_pending(),
            capacity: state.history.capacity(),
            count: state.history.history().len(),
        },
    }))
}

/// GET /api/v1/history/{id}
pub async fn get_history_record(
    State(state): State<AppState>,
    path: Result<Path<RecordId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let record = state
        .history
        .get(id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "HistoryRecord",
            id: id.to_string(),
        }))?;

    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/history/{id}
///
/// Remove one record. Unknown ids are not an error; the remaining list is
/// returned either way.
pub async fn delete_history_record(
    State(state): State<AppState>,
    path: Result<Path<RecordId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let remaining = state.history.remove(id).await?;

    tracing::info!(record_id = %id, remaining = remaining.len(), "History record removed");

    Ok(Json(DataResponse { data: remaining }))
}

/// DELETE /api/v1/history
pub async fn clear_history(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let remaining = state.history.clear().await?;

    tracing::info!("History cleared");

    Ok(Json(DataResponse { data: remaining }))
}

//! Stateless generation proxy.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use promptcraft_core::params::PromptParams;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub generated_text: String,
}

/// POST /api/v1/generate
///
/// Validate the parameters, forward them to the upstream model once, and
/// return the generated text. Nothing is recorded in history.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<PromptParams>, JsonRejection>,
) -> AppResult<Json<GenerateResponse>> {
    let Json(params) = payload?;
    params.validate()?;

    let generated_text = state.generator.generate(&params).await?;

    tracing::info!(
        platform = %params.platform,
        chars = generated_text.chars().count(),
        "Prompt generated",
    );

    Ok(Json(GenerateResponse { generated_text }))
}

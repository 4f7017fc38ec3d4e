//! Client for the server's own `/api/v1/generate` route.
//!
//! This is the client a front-end uses. It posts [`PromptParams`] as JSON
//! and turns `{ "error", "code" }` bodies back into typed failures.

use async_trait::async_trait;
use serde::Deserialize;

use promptcraft_core::error::{codes, GenerationError};
use promptcraft_core::generation::{normalize_generated_text, GenerationClient};
use promptcraft_core::params::PromptParams;

pub const GENERATE_PATH: &str = "/api/v1/generate";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    generated_text: String,
}

/// JSON error body emitted by the server.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: Option<String>,
}

pub struct RouteClient {
    client: reqwest::Client,
    base_url: String,
}

impl RouteClient {
    /// * `base_url` - Server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl GenerationClient for RouteClient {
    async fn generate(&self, params: &PromptParams) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(format!("{}{GENERATE_PATH}", self.base_url))
            .json(params)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(map_error_body(status.as_u16(), &body));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|_| GenerationError::EmptyResponse)?;
        normalize_generated_text(&parsed.generated_text)
    }
}

/// Map a non-2xx response from the server to a failure kind.
///
/// Unknown codes and unparseable bodies become
/// [`GenerationError::RemoteRejected`].
pub fn map_error_body(status: u16, body: &str) -> GenerationError {
    let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) else {
        return GenerationError::RemoteRejected {
            status,
            message: None,
        };
    };

    match parsed.code.as_deref() {
        Some(codes::CONTENT_BLOCKED) => GenerationError::ContentBlocked(parsed.error),
        Some(codes::EMPTY_RESPONSE) => GenerationError::EmptyResponse,
        Some(codes::UPSTREAM_UNAVAILABLE) => GenerationError::Transport(parsed.error),
        _ => GenerationError::RemoteRejected {
            status,
            message: Some(parsed.error),
        },
    }
}

//! Client for the Gemini `generateContent` REST endpoint.
//!
//! Builds the request body from a [`PromptRequest`], performs a single
//! `POST`, and maps the response envelope onto [`GenerationError`] kinds.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use promptcraft_core::error::GenerationError;
use promptcraft_core::generation::{normalize_generated_text, GenerationClient};
use promptcraft_core::params::PromptParams;
use promptcraft_core::prompt::PromptRequest;

use crate::config::GeminiConfig;

/// Finish reasons that mean the candidate was withheld for policy reasons.
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

const API_KEY_HEADER: &str = "x-goog-api-key";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

/// Subset of the `generateContent` response the client inspects.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    pub block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for a single Gemini model.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, params: &PromptParams) -> Result<String, GenerationError> {
        let request = PromptRequest::from_params(params);
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: [TextPart {
                    text: &request.system_instruction,
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [TextPart {
                    text: &request.user_message,
                }],
            }],
        };

        tracing::debug!(
            platform = %params.platform,
            model = %self.config.model,
            "Sending generation request",
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Generation request failed to complete");
                GenerationError::Transport(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Generation service rejected request");
            return Err(GenerationError::RemoteRejected {
                status: status.as_u16(),
                message: rejection_message(&text),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(error = %e, "Generation response was not valid JSON");
            GenerationError::EmptyResponse
        })?;

        interpret_response(parsed)
    }
}

// ---------------------------------------------------------------------------
// Response mapping
// ---------------------------------------------------------------------------

/// Extract `error.message` from a Gemini error body, if present.
pub fn rejection_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error.message)
        .filter(|m| !m.trim().is_empty())
}

/// Map a successful-status response envelope to generated text.
///
/// A prompt-level block wins over any candidate content; a candidate-level
/// safety stop only counts as a block when it produced no text.
pub fn interpret_response(response: GenerateContentResponse) -> Result<String, GenerationError> {
    if let Some(feedback) = response.prompt_feedback {
        if let Some(reason) = feedback.block_reason {
            let reason = feedback
                .block_reason_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(reason);
            tracing::info!(reason = %reason, "Generation blocked by content policy");
            return Err(GenerationError::ContentBlocked(reason));
        }
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GenerationError::EmptyResponse);
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        if let Some(reason) = candidate
            .finish_reason
            .filter(|r| BLOCKING_FINISH_REASONS.contains(&r.as_str()))
        {
            tracing::info!(reason = %reason, "Generation candidate withheld by content policy");
            return Err(GenerationError::ContentBlocked(reason));
        }
    }

    normalize_generated_text(&text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

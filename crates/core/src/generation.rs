//! The generation client seam.
//!
//! [`GenerationClient`] is implemented by every component that can turn
//! [`PromptParams`] into generated text over the network. The history
//! controller and the HTTP handlers only see this trait, so tests substitute
//! scripted fakes.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::params::PromptParams;

/// Performs exactly one outbound generation call per invocation.
///
/// Implementations must not retry and must return text already passed
/// through [`normalize_generated_text`].
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, params: &PromptParams) -> Result<String, GenerationError>;
}

/// Trim the raw model output, rejecting text that is empty once trimmed.
pub fn normalize_generated_text(raw: &str) -> Result<String, GenerationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(trimmed.to_string())
}

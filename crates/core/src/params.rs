//! User-supplied generation parameters and their validation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::platform::Platform;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of input fields on a single request.
pub const MAX_INPUT_FIELDS: usize = 20;

/// Maximum length of a single input value in characters.
pub const MAX_INPUT_LENGTH: usize = 2_000;

/// Field names are lowercase snake_case identifiers.
pub const FIELD_NAME_PATTERN: &str = r"^[a-z][a-z0-9_]{0,63}$";

static FIELD_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FIELD_NAME_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// PromptParams
// ---------------------------------------------------------------------------

/// The inputs that determine what gets generated.
///
/// `inputs` is an ordered map so that the rendered request and the persisted
/// form are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptParams {
    pub platform: Platform,
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,
}

impl PromptParams {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            inputs: BTreeMap::new(),
        }
    }

    /// Builder-style setter for a single input field.
    pub fn with_input(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.insert(field.into(), value.into());
        self
    }

    /// Inputs whose value is not blank, in field order, values trimmed.
    pub fn filled_inputs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inputs
            .iter()
            .map(|(k, v)| (k.as_str(), v.trim()))
            .filter(|(_, v)| !v.is_empty())
    }

    /// Check the request-level constraints enforced at the server boundary.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.inputs.len() > MAX_INPUT_FIELDS {
            return Err(CoreError::Validation(format!(
                "Too many input fields: maximum is {MAX_INPUT_FIELDS} (got {})",
                self.inputs.len()
            )));
        }

        for (field, value) in &self.inputs {
            if !FIELD_NAME_RE.is_match(field) {
                return Err(CoreError::Validation(format!(
                    "Invalid field name '{field}'. Must match {FIELD_NAME_PATTERN}"
                )));
            }
            let len = value.chars().count();
            if len > MAX_INPUT_LENGTH {
                return Err(CoreError::Validation(format!(
                    "Field '{field}' exceeds maximum length of {MAX_INPUT_LENGTH} characters (got {len})"
                )));
            }
        }

        if self.filled_inputs().next().is_none() {
            return Err(CoreError::Validation(
                "At least one input field must be filled in".to_string(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

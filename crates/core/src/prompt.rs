//! Rendering of [`PromptParams`] into the instruction sent to the model.

use crate::params::PromptParams;
use crate::platform::PlatformKind;

/// Instruction pair handed to a language model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    /// Role and output rules for the model.
    pub system_instruction: String,
    /// The user's inputs, one `Label: value` line per filled field.
    pub user_message: String,
}

impl PromptRequest {
    pub fn from_params(params: &PromptParams) -> Self {
        let platform = params.platform;
        let target = match platform.kind() {
            PlatformKind::Image => "an image generation prompt",
            PlatformKind::Text => "a prompt for a large language model",
        };

        let system_instruction = format!(
            "You are an expert prompt engineer. Write {target} for {label} based on \
             the details provided by the user. {conventions} Respond with the prompt \
             text only, without any preamble, explanation or surrounding quotes.",
            label = platform.label(),
            conventions = platform.conventions(),
        );

        let user_message = params
            .filled_inputs()
            .map(|(field, value)| format!("{}: {value}", humanize_field(field)))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            system_instruction,
            user_message,
        }
    }
}

/// `camera_angle` -> `Camera angle`.
pub fn humanize_field(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Target platform catalogue.
//!
//! A [`Platform`] is the model the generated prompt is written for. Each
//! platform has a stable wire identifier, a display label, and a
//! [`PlatformKind`] that decides which instruction template the request
//! builder uses.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// Whether a platform consumes image prompts or text prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Image,
    Text,
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "midjourney")]
    Midjourney,
    #[serde(rename = "dall-e")]
    DallE,
    #[serde(rename = "stable-diffusion")]
    StableDiffusion,
    #[serde(rename = "flux")]
    Flux,
    #[serde(rename = "chatgpt")]
    ChatGpt,
    #[serde(rename = "claude")]
    Claude,
    #[serde(rename = "gemini")]
    Gemini,
}

impl Platform {
    /// Every supported platform, image platforms first.
    pub const ALL: [Platform; 7] = [
        Platform::Midjourney,
        Platform::DallE,
        Platform::StableDiffusion,
        Platform::Flux,
        Platform::ChatGpt,
        Platform::Claude,
        Platform::Gemini,
    ];

    /// Wire identifier (matches the serde representation).
    pub fn id(self) -> &'static str {
        match self {
            Self::Midjourney => "midjourney",
            Self::DallE => "dall-e",
            Self::StableDiffusion => "stable-diffusion",
            Self::Flux => "flux",
            Self::ChatGpt => "chatgpt",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Midjourney => "Midjourney",
            Self::DallE => "DALL-E",
            Self::StableDiffusion => "Stable Diffusion",
            Self::Flux => "FLUX",
            Self::ChatGpt => "ChatGPT",
            Self::Claude => "Claude",
            Self::Gemini => "Gemini",
        }
    }

    pub fn kind(self) -> PlatformKind {
        match self {
            Self::Midjourney | Self::DallE | Self::StableDiffusion | Self::Flux => {
                PlatformKind::Image
            }
            Self::ChatGpt | Self::Claude | Self::Gemini => PlatformKind::Text,
        }
    }

    /// Platform-specific writing conventions appended to the system
    /// instruction.
    pub fn conventions(self) -> &'static str {
        match self {
            Self::Midjourney => {
                "Write a comma-separated descriptive prompt. End with Midjourney \
                 parameters such as --ar for aspect ratio and --v for model version \
                 when the inputs imply them."
            }
            Self::DallE => {
                "Write one or two natural-language sentences describing the scene \
                 in concrete visual detail. Do not use parameter flags."
            }
            Self::StableDiffusion => {
                "Write a comma-separated list of weighted keywords ordered by \
                 importance. Follow it with a line starting with 'Negative prompt:' \
                 listing what to avoid."
            }
            Self::Flux => {
                "Write a single detailed natural-language paragraph covering \
                 subject, composition, lighting and style."
            }
            Self::ChatGpt | Self::Claude | Self::Gemini => {
                "Write a structured instruction prompt with a role, the task, \
                 relevant context and the expected output format."
            }
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

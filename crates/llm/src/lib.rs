//! HTTP generation clients.
//!
//! - [`gemini::GeminiClient`] calls the hosted Gemini `generateContent` API
//!   and normalizes its response envelope.
//! - [`route::RouteClient`] calls the Promptcraft server's own
//!   `/api/v1/generate` route and maps its JSON error bodies back to
//!   [`GenerationError`](promptcraft_core::error::GenerationError).

pub mod config;
pub mod gemini;
pub mod route;

pub use config::GeminiConfig;
pub use gemini::GeminiClient;
pub use route::RouteClient;

//! Shared response envelope types for API handlers.
//!
//! Collection and record responses use a `{ "data": ... }` envelope. The
//! generate route is the exception: it answers `{ "generatedText": ... }`
//! directly because front-ends consume it as-is.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

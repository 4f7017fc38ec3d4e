#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Normalized outcome of a failed generation call.
///
/// Every [`GenerationClient`](crate::generation::GenerationClient)
/// implementation maps its transport and vendor-specific failures onto these
/// four kinds. Callers can rely on the kind alone for user-facing display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The call could not complete (network, DNS, TLS, client timeout).
    #[error("Generation service unreachable: {0}")]
    Transport(String),

    /// The remote answered with a non-success status.
    #[error(
        "Generation service rejected the request ({status}): {}",
        .message.as_deref().unwrap_or("no details provided")
    )]
    RemoteRejected {
        /// HTTP status code returned by the remote.
        status: u16,
        /// Remote-provided message, when the body carried one.
        message: Option<String>,
    },

    /// The remote refused the request for policy reasons.
    #[error("Content blocked: {0}")]
    ContentBlocked(String),

    /// The remote answered but returned no usable text.
    #[error("Generation service returned an empty response")]
    EmptyResponse,
}

impl GenerationError {
    /// Stable machine-readable code for this failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => codes::UPSTREAM_UNAVAILABLE,
            Self::RemoteRejected { .. } => codes::UPSTREAM_REJECTED,
            Self::ContentBlocked(_) => codes::CONTENT_BLOCKED,
            Self::EmptyResponse => codes::EMPTY_RESPONSE,
        }
    }
}

/// Error codes carried in the `code` field of JSON error bodies.
///
/// Shared between the server, which emits them, and
/// the route client, which maps them back to [`GenerationError`].
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const CONTENT_BLOCKED: &str = "CONTENT_BLOCKED";
    pub const UPSTREAM_REJECTED: &str = "UPSTREAM_REJECTED";
    pub const UPSTREAM_UNAVAILABLE: &str = "UPSTREAM_UNAVAILABLE";
    pub const EMPTY_RESPONSE: &str = "EMPTY_RESPONSE";
}

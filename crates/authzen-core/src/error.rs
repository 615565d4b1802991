//! Shared error type across authzen crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Unknown batch evaluation semantic.
    InvalidSemantic,
    /// No caller identity could be extracted.
    Unauthenticated,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::InvalidSemantic => "INVALID_SEMANTIC",
            ClientCode::Unauthenticated => "UNAUTHENTICATED",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, AuthzenError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzenError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid evaluations_semantic: {0}")]
    InvalidSemantic(String),
    #[error("action name is required for evaluation {index}")]
    MissingAction { index: usize },
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl AuthzenError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            AuthzenError::BadRequest(_) | AuthzenError::MissingAction { .. } => {
                ClientCode::BadRequest
            }
            AuthzenError::InvalidSemantic(_) => ClientCode::InvalidSemantic,
            AuthzenError::Unauthenticated(_) => ClientCode::Unauthenticated,
            AuthzenError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            AuthzenError::Internal(_) => ClientCode::Internal,
        }
    }
}

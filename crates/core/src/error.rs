//! Public error taxonomy shared by every layer.
//!
//! Each variant maps to a stable `(name, action, status_code)` triple that
//! the HTTP layer serializes verbatim. Adding a variant is an API change.

/// Message returned for any failure that is not one of the known kinds.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected internal error occurred.";

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{message}")]
    Validation { message: String, action: String },

    #[error("{message}")]
    NotFound { message: String, action: String },

    #[error("{message}")]
    Unauthorized { message: String, action: String },

    #[error("Method not allowed for this endpoint.")]
    MethodNotAllowed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            action: action.into(),
        }
    }

    pub fn not_found(message: impl Into<String>, action: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            action: action.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            action: action.into(),
        }
    }

    /// Stable kind name exposed to API clients.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "ValidationError",
            Self::NotFound { .. } => "NotFoundError",
            Self::Unauthorized { .. } => "UnauthorizedError",
            Self::MethodNotAllowed => "MethodNotAllowedError",
            Self::Internal(_) => "InternalServerError",
        }
    }

    /// Message safe to show to API clients.
    ///
    /// Internal errors never leak their detail; it is only logged.
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Suggested corrective action for the client.
    pub fn action(&self) -> &str {
        match self {
            Self::Validation { action, .. }
            | Self::NotFound { action, .. }
            | Self::Unauthorized { action, .. } => action,
            Self::MethodNotAllowed => "Check that the HTTP method is valid for this endpoint.",
            Self::Internal(_) => "Contact support.",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::NotFound { .. } => 404,
            Self::MethodNotAllowed => 405,
            Self::Internal(_) => 500,
        }
    }
}

//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{EntityId, IdParseError};

/// Domain layer errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: EntityId },

    #[error("Room is not mounted: {0}")]
    RoomNotMounted(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] IdParseError),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs and UI surfaces
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::NotFound { .. } => "UNKNOWN_ENTITY",
            Self::RoomNotMounted(_) => "UNKNOWN_ROOM",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::InvalidId(_) => "INVALID_ID",

            // Authorization
            Self::Unauthorized(_) => "UNAUTHORIZED",

            // Business Rules
            Self::Unsupported(_) => "UNSUPPORTED_OPERATION",

            // Infrastructure
            Self::TransportError(_) => "TRANSPORT_ERROR",
            Self::DecodeError(_) => "DECODE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::RoomNotMounted(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::ContentTooLong { .. } | Self::InvalidId(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if retrying the same call could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
                })
            })
            .collect();

        Self::ValidationError(messages.join("; "))
    }
}

//! Application error types
//!
//! Unified error handling for the collaboration client.

use collab_core::DomainError;

use crate::config::ConfigError;

/// Where a failure originated
///
/// Callers use this to decide how to surface it: connection failures flip the
/// connected flag, RPC failures leave state untouched, load failures become a
/// string error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Rpc,
    Rest,
    Config,
    Internal,
}

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    // Connection errors
    #[error("Not connected")]
    NotConnected,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Reconnection failed after {0} attempts")]
    ReconnectExhausted(u32),

    #[error("Authentication rejected")]
    AuthRejected,

    // Request errors
    #[error("Request timed out")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request rejected: {0}")]
    Rejected(String),

    // REST errors
    #[error("Failed to load: {0}")]
    LoadFailed(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl CollabError {
    /// Classify the failure
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotConnected
            | Self::ConnectionFailed(_)
            | Self::ReconnectExhausted(_)
            | Self::AuthRejected => ErrorCategory::Connection,

            Self::Timeout | Self::Cancelled | Self::Rejected(_) => ErrorCategory::Rpc,

            Self::LoadFailed(_) | Self::Domain(_) => ErrorCategory::Rest,

            Self::Config(_) => ErrorCategory::Config,

            Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Get error code for logs and UI surfaces
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotConnected => "NOT_CONNECTED",
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::ReconnectExhausted(_) => "RECONNECT_EXHAUSTED",
            Self::AuthRejected => "AUTH_REJECTED",
            Self::Timeout => "TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::Rejected(_) => "REJECTED",
            Self::LoadFailed(_) => "LOAD_FAILED",
            Self::Domain(e) => e.code(),
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if retrying the operation later could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotConnected | Self::ConnectionFailed(_) | Self::Timeout | Self::LoadFailed(_) => {
                true
            }
            Self::Domain(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Create a load failure from any displayable error
    #[must_use]
    pub fn load_failed(err: impl std::fmt::Display) -> Self {
        Self::LoadFailed(err.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for client operations
pub type CollabResult<T> = Result<T, CollabError>;

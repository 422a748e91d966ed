//! Session errors

use collab_common::CollabError;

use crate::transport::TransportError;

/// Session and request errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Not connected")]
    NotConnected,

    #[error("Request timed out")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Connection lost before the request was acknowledged")]
    ConnectionLost,

    #[error("Outbound queue is full")]
    Backpressure,

    #[error("Authentication rejected")]
    AuthRejected,

    #[error("Handshake timed out")]
    HandshakeTimeout,

    #[error("Handshake failed: {0}")]
    HandshakeFailed(String),

    #[error("Reconnection failed after {0} attempts")]
    ReconnectExhausted(u32),

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Failed to encode frame: {0}")]
    Encode(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SessionError {
    /// Check if the failure ends the session rather than a single attempt
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::AuthRejected | Self::ReconnectExhausted(_) | Self::MissingCredentials
        )
    }
}

impl From<SessionError> for CollabError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotConnected | SessionError::ConnectionLost => Self::NotConnected,
            SessionError::Timeout | SessionError::HandshakeTimeout => Self::Timeout,
            SessionError::Cancelled => Self::Cancelled,
            SessionError::AuthRejected | SessionError::MissingCredentials => Self::AuthRejected,
            SessionError::ReconnectExhausted(attempts) => Self::ReconnectExhausted(attempts),
            SessionError::Backpressure => Self::Rejected("outbound queue is full".to_string()),
            SessionError::HandshakeFailed(reason) => Self::ConnectionFailed(reason),
            SessionError::Transport(e) => Self::ConnectionFailed(e.to_string()),
            SessionError::Encode(reason) => Self::internal(anyhow::anyhow!(reason)),
        }
    }
}

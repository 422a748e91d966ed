//! Session state and lifecycle events

use collab_core::{RoomId, UserId};
use std::time::Duration;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection and none being attempted
    #[default]
    Disconnected,
    /// First connection attempt in progress
    Connecting,
    /// Handshake complete
    Connected,
    /// Waiting to retry after a lost or failed connection
    Reconnecting,
}

impl ConnectionState {
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// A connection is up or being worked on
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Disconnected)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Reconnecting => write!(f, "reconnecting"),
        }
    }
}

/// Raw connection lifecycle events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// First handshake completed
    Connected { user_id: UserId },
    /// Connection ended
    Disconnected { reason: String },
    /// A retry is scheduled
    Reconnecting { attempt: u32, delay: Duration },
    /// Handshake completed after a retry
    Reconnected { user_id: UserId },
    /// Retries exhausted or authentication rejected; the session is down
    ReconnectFailed { reason: String },
    /// Non-terminal error
    Error { message: String },
    /// A tracked room was joined again after a reconnect
    Rejoined {
        room: RoomId,
        active_users: Vec<UserId>,
    },
}

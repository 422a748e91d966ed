//! Protocol payload definitions
//!
//! Payloads carried in the `d` field of handshake, request, emit and ack frames.

use collab_core::{PresenceStatus, RoomId, UserId};
use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Default heartbeat interval (45 seconds)
    pub const DEFAULT_HEARTBEAT_INTERVAL: u64 = 45_000;

    /// Create a new Hello payload with default interval
    #[must_use]
    pub fn new() -> Self {
        Self {
            heartbeat_interval: Self::DEFAULT_HEARTBEAT_INTERVAL,
        }
    }

    /// Create a Hello payload with custom interval
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

impl Default for HelloPayload {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload for op 2 (Identify)
///
/// Sent by the client to authenticate the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Raw bearer token (no `Bearer ` prefix)
    pub token: String,

    /// Optional client properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IdentifyProperties>,
}

impl IdentifyPayload {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            properties: None,
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: IdentifyProperties) -> Self {
        self.properties = Some(properties);
        self
    }
}

/// Client connection properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    /// Operating system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    /// Client library name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// Client library version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl IdentifyProperties {
    /// Create empty properties
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Properties describing this build of the client
    #[must_use]
    pub fn current() -> Self {
        Self::new()
            .with_os(std::env::consts::OS)
            .with_client(env!("CARGO_PKG_NAME"))
            .with_version(env!("CARGO_PKG_VERSION"))
    }

    /// Set operating system
    #[must_use]
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = Some(os.into());
        self
    }

    /// Set client name
    #[must_use]
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Set client version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Payload for op 6 (Ack)
///
/// `success: false` carries a server-side reason and never mutates local state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckPayload {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_users: Option<Vec<UserId>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckPayload {
    /// Successful ack without a member list
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            active_users: None,
            error: None,
        }
    }

    /// Successful join ack with the room's current members
    #[must_use]
    pub fn joined(active_users: Vec<UserId>) -> Self {
        Self {
            success: true,
            active_users: Some(active_users),
            error: None,
        }
    }

    /// Rejected request
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            active_users: None,
            error: Some(error.into()),
        }
    }
}

/// Payload for `join_room` / `leave_room` requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRequest {
    pub room: RoomId,
}

/// Payload for `typing_start` / `typing_stop` emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub room: RoomId,
    pub is_typing: bool,
}

/// Payload for `presence_update` emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUpdatePayload {
    pub room: RoomId,
    pub status: PresenceStatus,
}

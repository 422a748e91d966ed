//! Presence status and the records kept by the ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// User presence status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// User is online and active
    Online,
    /// User stepped away
    Away,
    /// User is busy (do not disturb)
    Busy,
    /// User is offline
    #[default]
    Offline,
}

impl PresenceStatus {
    /// Check if this status should be shown as present to others
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Offline)
    }

    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PresenceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "away" => Ok(Self::Away),
            "busy" => Ok(Self::Busy),
            "offline" => Ok(Self::Offline),
            _ => Err(format!("Invalid status: {s}")),
        }
    }
}

/// Global presence record, one per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    pub user_id: UserId,
    pub status: PresenceStatus,
    pub last_seen: DateTime<Utc>,
}

impl PresenceRecord {
    /// Create a record observed at `now`
    #[must_use]
    pub fn new(user_id: UserId, status: PresenceStatus, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            status,
            last_seen: now,
        }
    }
}

/// Typing entry for a user in a room
///
/// Present only while the user is typing; `is_typing` is always true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingEntry {
    pub is_typing: bool,
    pub since: DateTime<Utc>,
}

impl TypingEntry {
    #[must_use]
    pub fn started(now: DateTime<Utc>) -> Self {
        Self {
            is_typing: true,
            since: now,
        }
    }
}

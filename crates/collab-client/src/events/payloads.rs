//! Event payload definitions
//!
//! Data carried by server events that are not a full entity.

use collab_core::{EntityId, PresenceStatus, RoomId, UserId};
use serde::{Deserialize, Serialize};

// === Connection Events ===

/// `ready` event payload
///
/// Sent after successful Identify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyEvent {
    /// The authenticated user
    pub user_id: UserId,
    /// Server-assigned session id, for logs
    pub session_id: String,
}

// === Membership Events ===

/// `user_joined` / `user_left` event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipEvent {
    pub room: RoomId,
    pub user_id: UserId,
    /// Server's member list after the change
    #[serde(default)]
    pub active_users: Vec<UserId>,
}

// === Presence Events ===

/// `presence_changed` event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceChangedEvent {
    pub room: RoomId,
    pub user_id: UserId,
    pub status: PresenceStatus,
}

/// `typing_indicator` event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingEvent {
    pub room: RoomId,
    pub user_id: UserId,
    pub is_typing: bool,
}

// === Entity Events ===

/// `note_deleted` event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDeletedEvent {
    pub ticket_id: EntityId,
    pub note_id: EntityId,
}

/// `subtask_deleted` event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskDeletedEvent {
    pub ticket_id: EntityId,
    pub subtask_id: EntityId,
}

/// `message_deleted` event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeletedEvent {
    pub team_id: EntityId,
    pub message_id: EntityId,
}

/// `reaction_added` / `reaction_removed` event payload
///
/// `entity_id` names a note in ticket rooms and a message in team rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionEvent {
    pub room: RoomId,
    pub entity_id: EntityId,
    pub emoji: String,
    pub user_id: UserId,
}

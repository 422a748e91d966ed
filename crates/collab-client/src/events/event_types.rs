//! Event names
//!
//! Every name sent in the `t` field of dispatch, emit and request frames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Realtime event names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    // Connection events
    /// Sent after successful Identify
    Ready,

    // Membership events
    UserJoined,
    UserLeft,

    // Presence events
    PresenceChanged,
    TypingIndicator,

    // Note events
    NoteCreated,
    NoteUpdated,
    NoteDeleted,

    // Reaction events
    ReactionAdded,
    ReactionRemoved,

    // Checklist events
    /// Subtask created or changed
    ChecklistUpdated,
    SubtaskDeleted,

    // Team message events
    MessageCreated,
    MessageDeleted,

    // Client requests
    JoinRoom,
    LeaveRoom,

    // Client emits
    TypingStart,
    TypingStop,
    PresenceUpdate,
}

impl EventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::UserJoined => "user_joined",
            Self::UserLeft => "user_left",
            Self::PresenceChanged => "presence_changed",
            Self::TypingIndicator => "typing_indicator",
            Self::NoteCreated => "note_created",
            Self::NoteUpdated => "note_updated",
            Self::NoteDeleted => "note_deleted",
            Self::ReactionAdded => "reaction_added",
            Self::ReactionRemoved => "reaction_removed",
            Self::ChecklistUpdated => "checklist_updated",
            Self::SubtaskDeleted => "subtask_deleted",
            Self::MessageCreated => "message_created",
            Self::MessageDeleted => "message_deleted",
            Self::JoinRoom => "join_room",
            Self::LeaveRoom => "leave_room",
            Self::TypingStart => "typing_start",
            Self::TypingStop => "typing_stop",
            Self::PresenceUpdate => "presence_update",
        }
    }

    /// Parse an event type from a string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ready" => Some(Self::Ready),
            "user_joined" => Some(Self::UserJoined),
            "user_left" => Some(Self::UserLeft),
            "presence_changed" => Some(Self::PresenceChanged),
            "typing_indicator" => Some(Self::TypingIndicator),
            "note_created" => Some(Self::NoteCreated),
            "note_updated" => Some(Self::NoteUpdated),
            "note_deleted" => Some(Self::NoteDeleted),
            "reaction_added" => Some(Self::ReactionAdded),
            "reaction_removed" => Some(Self::ReactionRemoved),
            "checklist_updated" => Some(Self::ChecklistUpdated),
            "subtask_deleted" => Some(Self::SubtaskDeleted),
            "message_created" => Some(Self::MessageCreated),
            "message_deleted" => Some(Self::MessageDeleted),
            "join_room" => Some(Self::JoinRoom),
            "leave_room" => Some(Self::LeaveRoom),
            "typing_start" => Some(Self::TypingStart),
            "typing_stop" => Some(Self::TypingStop),
            "presence_update" => Some(Self::PresenceUpdate),
            _ => None,
        }
    }

    /// Check if the server dispatches this event
    #[must_use]
    pub const fn is_server_event(self) -> bool {
        !matches!(
            self,
            Self::JoinRoom
                | Self::LeaveRoom
                | Self::TypingStart
                | Self::TypingStop
                | Self::PresenceUpdate
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<EventType> for String {
    fn from(event: EventType) -> Self {
        event.as_str().to_string()
    }
}

//! Typed inbound events
//!
//! Dispatch frames are decoded exactly once, at the transport boundary, into
//! `InboundEvent`. Nothing past the session looks at raw event names.

use collab_core::{Entity, Note, RoomId, Subtask, TeamMessage, UserId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{
    EventType, MembershipEvent, MessageDeletedEvent, NoteDeletedEvent, PresenceChangedEvent,
    ReactionEvent, ReadyEvent, SubtaskDeletedEvent, TypingEvent,
};

/// A server event with its typed payload
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Ready(ReadyEvent),
    UserJoined(MembershipEvent),
    UserLeft(MembershipEvent),
    PresenceChanged(PresenceChangedEvent),
    TypingIndicator(TypingEvent),
    NoteCreated(Note),
    NoteUpdated(Note),
    NoteDeleted(NoteDeletedEvent),
    ReactionAdded(ReactionEvent),
    ReactionRemoved(ReactionEvent),
    ChecklistUpdated(Subtask),
    SubtaskDeleted(SubtaskDeletedEvent),
    MessageCreated(TeamMessage),
    MessageDeleted(MessageDeletedEvent),
}

/// Failure to decode a dispatch frame
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("event {0} is not dispatched by the server")]
    NotInbound(EventType),

    #[error("malformed {event} payload: {source}")]
    Malformed {
        event: EventType,
        #[source]
        source: serde_json::Error,
    },
}

fn parse<T: DeserializeOwned>(event: EventType, data: Value) -> Result<T, DecodeError> {
    serde_json::from_value(data).map_err(|source| DecodeError::Malformed { event, source })
}

impl InboundEvent {
    /// Decode a dispatch frame's `t` and `d`
    ///
    /// A missing payload decodes as `null`, which fails for every event that
    /// carries data.
    pub fn decode(name: &str, data: Option<Value>) -> Result<Self, DecodeError> {
        let event =
            EventType::from_str(name).ok_or_else(|| DecodeError::UnknownEvent(name.to_string()))?;
        let data = data.unwrap_or(Value::Null);

        Ok(match event {
            EventType::Ready => Self::Ready(parse(event, data)?),
            EventType::UserJoined => Self::UserJoined(parse(event, data)?),
            EventType::UserLeft => Self::UserLeft(parse(event, data)?),
            EventType::PresenceChanged => Self::PresenceChanged(parse(event, data)?),
            EventType::TypingIndicator => Self::TypingIndicator(parse(event, data)?),
            EventType::NoteCreated => Self::NoteCreated(parse(event, data)?),
            EventType::NoteUpdated => Self::NoteUpdated(parse(event, data)?),
            EventType::NoteDeleted => Self::NoteDeleted(parse(event, data)?),
            EventType::ReactionAdded => Self::ReactionAdded(parse(event, data)?),
            EventType::ReactionRemoved => Self::ReactionRemoved(parse(event, data)?),
            EventType::ChecklistUpdated => Self::ChecklistUpdated(parse(event, data)?),
            EventType::SubtaskDeleted => Self::SubtaskDeleted(parse(event, data)?),
            EventType::MessageCreated => Self::MessageCreated(parse(event, data)?),
            EventType::MessageDeleted => Self::MessageDeleted(parse(event, data)?),
            EventType::JoinRoom
            | EventType::LeaveRoom
            | EventType::TypingStart
            | EventType::TypingStop
            | EventType::PresenceUpdate => return Err(DecodeError::NotInbound(event)),
        })
    }

    /// The event name this variant was decoded from
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Ready(_) => EventType::Ready,
            Self::UserJoined(_) => EventType::UserJoined,
            Self::UserLeft(_) => EventType::UserLeft,
            Self::PresenceChanged(_) => EventType::PresenceChanged,
            Self::TypingIndicator(_) => EventType::TypingIndicator,
            Self::NoteCreated(_) => EventType::NoteCreated,
            Self::NoteUpdated(_) => EventType::NoteUpdated,
            Self::NoteDeleted(_) => EventType::NoteDeleted,
            Self::ReactionAdded(_) => EventType::ReactionAdded,
            Self::ReactionRemoved(_) => EventType::ReactionRemoved,
            Self::ChecklistUpdated(_) => EventType::ChecklistUpdated,
            Self::SubtaskDeleted(_) => EventType::SubtaskDeleted,
            Self::MessageCreated(_) => EventType::MessageCreated,
            Self::MessageDeleted(_) => EventType::MessageDeleted,
        }
    }

    /// The room this event is scoped to, if any
    #[must_use]
    pub fn room(&self) -> Option<RoomId> {
        match self {
            Self::Ready(_) => None,
            Self::UserJoined(e) | Self::UserLeft(e) => Some(e.room),
            Self::PresenceChanged(e) => Some(e.room),
            Self::TypingIndicator(e) => Some(e.room),
            Self::NoteCreated(note) | Self::NoteUpdated(note) => Some(note.room()),
            Self::NoteDeleted(e) => Some(RoomId::Ticket(e.ticket_id)),
            Self::ReactionAdded(e) | Self::ReactionRemoved(e) => Some(e.room),
            Self::ChecklistUpdated(subtask) => Some(subtask.room()),
            Self::SubtaskDeleted(e) => Some(RoomId::Ticket(e.ticket_id)),
            Self::MessageCreated(message) => Some(message.room()),
            Self::MessageDeleted(e) => Some(RoomId::Team(e.team_id)),
        }
    }

    /// The user whose activity produced this event, for presence freshness
    #[must_use]
    pub fn actor(&self) -> Option<&UserId> {
        match self {
            Self::UserJoined(e) | Self::UserLeft(e) => Some(&e.user_id),
            Self::PresenceChanged(e) => Some(&e.user_id),
            Self::TypingIndicator(e) => Some(&e.user_id),
            Self::ReactionAdded(e) | Self::ReactionRemoved(e) => Some(&e.user_id),
            _ => None,
        }
    }

    /// Check if this event changes presence state rather than an entity list
    #[must_use]
    pub fn is_presence_event(&self) -> bool {
        matches!(
            self,
            Self::UserJoined(_)
                | Self::UserLeft(_)
                | Self::PresenceChanged(_)
                | Self::TypingIndicator(_)
        )
    }

    /// Split back into a wire name and payload
    pub fn into_parts(self) -> (EventType, Value) {
        fn value<T: Serialize>(payload: &T) -> Value {
            serde_json::to_value(payload).unwrap_or(Value::Null)
        }

        let event = self.event_type();
        let data = match &self {
            Self::Ready(e) => value(e),
            Self::UserJoined(e) | Self::UserLeft(e) => value(e),
            Self::PresenceChanged(e) => value(e),
            Self::TypingIndicator(e) => value(e),
            Self::NoteCreated(note) | Self::NoteUpdated(note) => value(note),
            Self::NoteDeleted(e) => value(e),
            Self::ReactionAdded(e) | Self::ReactionRemoved(e) => value(e),
            Self::ChecklistUpdated(subtask) => value(subtask),
            Self::SubtaskDeleted(e) => value(e),
            Self::MessageCreated(message) => value(message),
            Self::MessageDeleted(e) => value(e),
        };
        (event, data)
    }
}

//! Realtime events
//!
//! Event names, payloads, and the typed `InboundEvent` every dispatch frame is
//! decoded into.

mod event_types;
mod inbound;
mod payloads;

pub use event_types::EventType;
pub use inbound::{DecodeError, InboundEvent};
pub use payloads::{
    MembershipEvent, MessageDeletedEvent, NoteDeletedEvent, PresenceChangedEvent, ReactionEvent,
    ReadyEvent, SubtaskDeletedEvent, TypingEvent,
};

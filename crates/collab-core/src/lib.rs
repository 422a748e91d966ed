//! # collab-core
//!
//! Domain layer containing identifiers, the presence ledger, entities, entity
//! lists, and repository traits. This crate performs no I/O.

pub mod entities;
pub mod error;
pub mod presence;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Entity, EntityList, Immutable, MessageDraft, Note, NoteDraft, NotePatch, Reaction, Subtask,
    SubtaskDraft, SubtaskPatch, TeamMessage, Upsert,
};
pub use error::DomainError;
pub use presence::{
    PresenceLedger, PresenceRecord, PresenceStatus, RoomState, SharedLedger, SweepReport,
    TypingEntry,
};
pub use traits::{EntityRepository, RepoResult};
pub use value_objects::{EntityId, IdParseError, RoomId, UserId};

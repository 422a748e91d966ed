//! Domain entities - records owned by the server and mirrored per room

mod entity;
mod list;
mod message;
mod note;
mod reaction;
mod subtask;

pub use entity::{Entity, Immutable};
pub use list::{EntityList, Upsert};
pub use message::{MessageDraft, TeamMessage};
pub use note::{Note, NoteDraft, NotePatch};
pub use reaction::{add_reaction, remove_reaction, Reaction};
pub use subtask::{Subtask, SubtaskDraft, SubtaskPatch};

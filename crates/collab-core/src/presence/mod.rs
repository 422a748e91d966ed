//! Presence module.
//!
//! Tracks global user presence, room membership, and typing indicators.

mod ledger;
mod shared;
mod status;

pub use ledger::{PresenceLedger, RoomState};
pub use shared::{SharedLedger, SweepReport};
pub use status::{PresenceRecord, PresenceStatus, TypingEntry};

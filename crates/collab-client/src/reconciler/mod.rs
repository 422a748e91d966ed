//! Room reconcilers
//!
//! A reconciler mirrors one room: REST loads seed its lists, routed server
//! events keep them current, and the ledger carries who is present and typing.

mod mount;
mod team;
mod ticket;
mod typing;

pub use mount::{LoadState, RoomContext};
pub use team::TeamRoom;
pub use ticket::TicketCollaboration;
pub use typing::{TypingDebouncer, DEFAULT_TYPING_IDLE};

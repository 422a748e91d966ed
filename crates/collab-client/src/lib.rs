//! # collab-client
//!
//! Realtime collaboration client: one shared session, an event router that
//! feeds a presence ledger, and reconcilers that mirror ticket and team rooms.

pub mod client;
pub mod events;
pub mod protocol;
pub mod reconciler;
pub mod rest;
pub mod router;
pub mod session;
pub mod sweeper;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{ClientHandle, CollabClient};
pub use events::{EventType, InboundEvent};
pub use reconciler::{LoadState, RoomContext, TeamRoom, TicketCollaboration};
pub use rest::{HttpEntityRepository, RestClient};
pub use router::{EntitySink, EventRouter};
pub use session::{
    ConnectionState, RealtimeSession, ReconnectPolicy, SessionError, SessionEvent, SessionOptions,
};
pub use sweeper::PresenceSweeper;
pub use transport::{Connector, WsConnector};

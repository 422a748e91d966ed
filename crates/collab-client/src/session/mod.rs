//! Realtime session
//!
//! Connection lifecycle, handshake, heartbeats, reconnects, and room
//! request/acknowledgement over one shared connection.

mod error;
mod lease;
mod reconnect;
mod session;
mod state;

pub use error::SessionError;
pub use lease::SessionLease;
pub use reconnect::ReconnectPolicy;
pub use session::{RealtimeSession, SessionOptions};
pub use state::{ConnectionState, SessionEvent};

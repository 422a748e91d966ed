//! Transport layer
//!
//! A `Connector` opens one text-frame channel to the realtime server. The
//! session owns the protocol; transports only move strings.

mod websocket;

use async_trait::async_trait;
use tokio::sync::mpsc;

#[cfg(test)]
pub(crate) use memory::{MemoryConnector, MemoryPeer};
pub use websocket::WsConnector;

/// Channel buffer size for frames in either direction
pub(crate) const FRAME_BUFFER_SIZE: usize = 100;

/// Something received from the server side of a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text frame
    Text(String),
    /// The connection ended; `code` is the WebSocket close code, if any
    Closed { code: Option<u16>, reason: String },
}

/// One open connection
///
/// Dropping `outbound` closes the connection.
#[derive(Debug)]
pub struct Channel {
    pub outbound: mpsc::Sender<String>,
    pub inbound: mpsc::Receiver<TransportEvent>,
}

/// Transport errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Connection closed")]
    Closed,
}

/// Opens connections to the realtime server
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, endpoint: &str) -> Result<Channel, TransportError>;
}

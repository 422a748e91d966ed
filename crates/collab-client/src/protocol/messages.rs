//! Realtime message format
//!
//! Defines the envelope for every WebSocket frame.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AckPayload, CloseCode, HelloPayload, IdentifyPayload, OpCode};

/// Realtime message envelope
///
/// All messages sent over the WebSocket connection follow this format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event name (Dispatch, Emit, Request)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Request id (Request, Ack)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Event data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    fn bare(op: OpCode) -> Self {
        Self {
            op,
            t: None,
            id: None,
            d: None,
        }
    }

    // === Client Messages ===

    /// Create a Heartbeat message (op=1)
    #[must_use]
    pub fn heartbeat() -> Self {
        Self::bare(OpCode::Heartbeat)
    }

    /// Create an Identify message (op=2)
    #[must_use]
    pub fn identify(payload: &IdentifyPayload) -> Self {
        Self {
            d: serde_json::to_value(payload).ok(),
            ..Self::bare(OpCode::Identify)
        }
    }

    /// Create an Emit message (op=3)
    #[must_use]
    pub fn emit(event: impl Into<String>, data: Value) -> Self {
        Self {
            t: Some(event.into()),
            d: Some(data),
            ..Self::bare(OpCode::Emit)
        }
    }

    /// Create a Request message (op=4)
    #[must_use]
    pub fn request(event: impl Into<String>, id: u64, data: Value) -> Self {
        Self {
            t: Some(event.into()),
            id: Some(id),
            d: Some(data),
            ..Self::bare(OpCode::Request)
        }
    }

    // === Server Messages ===

    /// Create a Dispatch message (op=0)
    #[must_use]
    pub fn dispatch(event: impl Into<String>, data: Value) -> Self {
        Self {
            t: Some(event.into()),
            d: Some(data),
            ..Self::bare(OpCode::Dispatch)
        }
    }

    /// Create a Hello message (op=10)
    #[must_use]
    pub fn hello(payload: HelloPayload) -> Self {
        Self {
            d: serde_json::to_value(payload).ok(),
            ..Self::bare(OpCode::Hello)
        }
    }

    /// Create a Hello message with default heartbeat interval
    #[must_use]
    pub fn hello_default() -> Self {
        Self::hello(HelloPayload::new())
    }

    /// Create an Ack message (op=6) for request `id`
    #[must_use]
    pub fn ack(id: u64, payload: &AckPayload) -> Self {
        Self {
            id: Some(id),
            d: serde_json::to_value(payload).ok(),
            ..Self::bare(OpCode::Ack)
        }
    }

    /// Create a Heartbeat ACK message (op=11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::bare(OpCode::HeartbeatAck)
    }

    /// Create a Reconnect message (op=5)
    #[must_use]
    pub fn reconnect() -> Self {
        Self::bare(OpCode::Reconnect)
    }

    /// Create an Invalid Session message (op=9)
    #[must_use]
    pub fn invalid_session() -> Self {
        Self::bare(OpCode::InvalidSession)
    }

    // === Parsing ===

    /// Decode `d` into `T`, if present and well-formed
    pub fn payload<T: DeserializeOwned>(&self) -> Option<T> {
        self.d
            .as_ref()
            .and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Try to parse as a Hello payload (op=10)
    pub fn as_hello(&self) -> Option<HelloPayload> {
        if self.op != OpCode::Hello {
            return None;
        }
        self.payload()
    }

    /// Try to parse as an Identify payload (op=2)
    pub fn as_identify(&self) -> Option<IdentifyPayload> {
        if self.op != OpCode::Identify {
            return None;
        }
        self.payload()
    }

    /// Try to parse as an Ack, returning the request id and payload (op=6)
    pub fn as_ack(&self) -> Option<(u64, AckPayload)> {
        if self.op != OpCode::Ack {
            return None;
        }
        Some((self.id?, self.payload()?))
    }

    // === Utilities ===

    /// Check if this is a valid client message
    #[must_use]
    pub fn is_valid_client_message(&self) -> bool {
        self.op.is_client_op()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create an error close frame
    #[must_use]
    pub fn close_frame(code: CloseCode) -> (u16, String) {
        (code.as_u16(), code.description().to_string())
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GatewayMessage(op={}", self.op)?;
        if let Some(t) = &self.t {
            write!(f, ", t={t}")?;
        }
        if let Some(id) = self.id {
            write!(f, ", id={id}")?;
        }
        write!(f, ")")
    }
}

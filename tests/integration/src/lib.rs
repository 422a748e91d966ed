//! Integration test utilities for the collaboration client
//!
//! This crate runs an in-process realtime and REST server so the client can
//! be exercised end to end over real sockets.

pub mod fixtures;
pub mod gateway;

pub use fixtures::*;
pub use gateway::GatewayState;
pub use helpers::*;

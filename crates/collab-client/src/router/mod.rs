//! Event routing
//!
//! The only place inbound events are interpreted.

mod dispatcher;

pub use dispatcher::{EntitySink, EventRouter, SubscriptionId};

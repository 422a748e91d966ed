//! # collab-common
//!
//! Shared utilities including configuration, error handling, credentials, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::Credentials;
pub use config::{
    AppSettings, ClientConfig, ConfigError, EndpointConfig, Environment, Namespace,
    PresenceConfig, ReconnectConfig, TimeoutConfig,
};
pub use error::{CollabError, CollabResult, ErrorCategory};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};

//! Application error types

mod app_error;

pub use app_error::{CollabError, CollabResult, ErrorCategory};

//! Authentication utilities

mod credentials;

pub use credentials::Credentials;

//! REST collaborators

mod http_repository;

pub use http_repository::{HttpEntityRepository, RestClient};

//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs from the REST API; the client crate
//! provides the HTTP implementation.

use async_trait::async_trait;

use crate::entities::Entity;
use crate::error::DomainError;
use crate::value_objects::{EntityId, RoomId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// CRUD access to one entity kind, scoped by room
///
/// Writes return the server's view of the record, but callers mirroring a
/// room must not apply it; the matching realtime event does that.
#[async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// List every entity in the room, in server order
    async fn list(&self, room: RoomId) -> RepoResult<Vec<E>>;

    /// Create a new entity
    async fn create(&self, room: RoomId, draft: &E::Draft) -> RepoResult<E>;

    /// Apply a partial update
    async fn update(&self, room: RoomId, id: EntityId, patch: &E::Patch) -> RepoResult<E>;

    /// Delete an entity
    async fn delete(&self, room: RoomId, id: EntityId) -> RepoResult<()>;

    /// Toggle the caller's reaction with `emoji`
    async fn toggle_reaction(&self, room: RoomId, id: EntityId, emoji: &str) -> RepoResult<()>;
}

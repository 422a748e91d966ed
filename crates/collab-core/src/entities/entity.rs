//! Entity contract shared by notes, subtasks, and team messages

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Reaction;
use crate::value_objects::{EntityId, RoomId};

/// A server-owned record that lives in one room's list
pub trait Entity:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Payload for creating a new entity
    type Draft: Serialize + Validate + Debug + Send + Sync;

    /// Payload for a partial update
    type Patch: Serialize + Validate + Debug + Send + Sync;

    /// Singular name used in errors and logs
    const KIND: &'static str;

    /// REST collection segment
    const COLLECTION: &'static str;

    fn id(&self) -> EntityId;

    /// The room this entity belongs to
    fn room(&self) -> RoomId;

    /// Reaction groups, if this entity kind supports reactions
    fn reactions_mut(&mut self) -> Option<&mut Vec<Reaction>> {
        None
    }
}

/// Patch type for entities that cannot be edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Immutable {}

impl Validate for Immutable {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match *self {}
    }
}

/// Reject strings that are empty after trimming
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

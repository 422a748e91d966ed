//! Subtask entity - a checklist item on a support ticket

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::entity::not_blank;
use super::Entity;
use crate::value_objects::{EntityId, RoomId};

/// Subtask entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: EntityId,
    pub ticket_id: EntityId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub position: u32,
}

impl Subtask {
    /// Create a new, open Subtask
    pub fn new(id: EntityId, ticket_id: EntityId, title: String, position: u32) -> Self {
        Self {
            id,
            ticket_id,
            title,
            completed: false,
            position,
        }
    }
}

impl Entity for Subtask {
    type Draft = SubtaskDraft;
    type Patch = SubtaskPatch;

    const KIND: &'static str = "subtask";
    const COLLECTION: &'static str = "subtasks";

    fn id(&self) -> EntityId {
        self.id
    }

    fn room(&self) -> RoomId {
        RoomId::Ticket(self.ticket_id)
    }
}

/// Create subtask request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SubtaskDraft {
    #[validate(
        length(max = 200, message = "Subtask title must be at most 200 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,
}

impl SubtaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

/// Update subtask request
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct SubtaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        length(max = 200, message = "Subtask title must be at most 200 characters"),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl SubtaskPatch {
    /// Patch that only sets the completion flag
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

//! Note entity - a comment on a support ticket

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::entity::not_blank;
use super::{Entity, Reaction};
use crate::value_objects::{EntityId, RoomId, UserId};

/// Note entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: EntityId,
    pub ticket_id: EntityId,
    pub author_id: UserId,
    pub body: String,
    /// Internal notes are hidden from the customer
    #[serde(default)]
    pub internal: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Note {
    /// Create a new Note
    pub fn new(id: EntityId, ticket_id: EntityId, author_id: UserId, body: String) -> Self {
        Self {
            id,
            ticket_id,
            author_id,
            body,
            internal: false,
            created_at: Utc::now(),
            updated_at: None,
            reactions: Vec::new(),
        }
    }

    /// Check if note has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }
}

impl Entity for Note {
    type Draft = NoteDraft;
    type Patch = NotePatch;

    const KIND: &'static str = "note";
    const COLLECTION: &'static str = "notes";

    fn id(&self) -> EntityId {
        self.id
    }

    fn room(&self) -> RoomId {
        RoomId::Ticket(self.ticket_id)
    }

    fn reactions_mut(&mut self) -> Option<&mut Vec<Reaction>> {
        Some(&mut self.reactions)
    }
}

/// Create note request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NoteDraft {
    #[validate(
        length(max = 10000, message = "Note must be at most 10000 characters"),
        custom(function = "not_blank")
    )]
    pub body: String,

    pub internal: bool,
}

impl NoteDraft {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            internal: false,
        }
    }

    /// Mark the draft as an internal note
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }
}

/// Update note request
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        length(max = 10000, message = "Note must be at most 10000 characters"),
        custom(function = "not_blank")
    )]
    pub body: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
}

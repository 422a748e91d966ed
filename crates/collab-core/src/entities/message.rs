//! Team message entity - a chat message in a team channel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::entity::not_blank;
use super::{Entity, Immutable, Reaction};
use crate::value_objects::{EntityId, RoomId, UserId};

/// Team message entity
///
/// Messages are never edited; only reactions change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMessage {
    pub id: EntityId,
    pub team_id: EntityId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl TeamMessage {
    /// Create a new TeamMessage
    pub fn new(id: EntityId, team_id: EntityId, author_id: UserId, content: String) -> Self {
        Self {
            id,
            team_id,
            author_id,
            content,
            created_at: Utc::now(),
            reactions: Vec::new(),
        }
    }

    /// Get a truncated preview of the message (for notifications)
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.content[..end]
        }
    }
}

impl Entity for TeamMessage {
    type Draft = MessageDraft;
    type Patch = Immutable;

    const KIND: &'static str = "message";
    const COLLECTION: &'static str = "messages";

    fn id(&self) -> EntityId {
        self.id
    }

    fn room(&self) -> RoomId {
        RoomId::Team(self.team_id)
    }

    fn reactions_mut(&mut self) -> Option<&mut Vec<Reaction>> {
        Some(&mut self.reactions)
    }
}

/// Send message request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct MessageDraft {
    #[validate(
        length(max = 2000, message = "Message must be at most 2000 characters"),
        custom(function = "not_blank")
    )]
    pub content: String,
}

impl MessageDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

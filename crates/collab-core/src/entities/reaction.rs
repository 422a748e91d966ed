//! Reaction entity - emoji reactions grouped per emoji

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// One emoji and the users who reacted with it
///
/// A group never holds an empty `user_ids`; removing the last user removes
/// the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub emoji: String,
    #[serde(default)]
    pub user_ids: Vec<UserId>,
}

impl Reaction {
    /// Create a group with a single reacting user
    pub fn new(emoji: impl Into<String>, user_id: UserId) -> Self {
        Self {
            emoji: emoji.into(),
            user_ids: vec![user_id],
        }
    }

    /// Number of users who reacted
    #[inline]
    pub fn count(&self) -> usize {
        self.user_ids.len()
    }

    /// Check if a user is part of this group
    #[inline]
    pub fn includes(&self, user_id: &UserId) -> bool {
        self.user_ids.contains(user_id)
    }
}

/// Add `user_id` to the `emoji` group, creating it if needed
///
/// Returns `false` when the user had already reacted with that emoji.
pub fn add_reaction(reactions: &mut Vec<Reaction>, emoji: &str, user_id: &UserId) -> bool {
    match reactions.iter_mut().find(|r| r.emoji == emoji) {
        Some(group) if group.includes(user_id) => false,
        Some(group) => {
            group.user_ids.push(user_id.clone());
            true
        }
        None => {
            reactions.push(Reaction::new(emoji, user_id.clone()));
            true
        }
    }
}

/// Remove `user_id` from the `emoji` group, dropping the group when empty
///
/// Returns `false` when there was nothing to remove.
pub fn remove_reaction(reactions: &mut Vec<Reaction>, emoji: &str, user_id: &UserId) -> bool {
    let Some(index) = reactions.iter().position(|r| r.emoji == emoji) else {
        return false;
    };

    let group = &mut reactions[index];
    let before = group.user_ids.len();
    group.user_ids.retain(|u| u != user_id);
    let removed = group.user_ids.len() != before;

    if group.user_ids.is_empty() {
        reactions.remove(index);
    }
    removed
}

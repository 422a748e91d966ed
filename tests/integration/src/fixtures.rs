//! Test fixtures and data generators
//!
//! Tokens map one-to-one onto users: `token-<user>` authenticates `<user>`.

use collab_core::{EntityId, Note, Subtask, TeamMessage, UserId};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique room ids
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// A room id no other test uses
pub fn unique_id() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

const TOKEN_PREFIX: &str = "token-";

/// Bearer token that authenticates `user`
pub fn token_for(user: &str) -> String {
    format!("{TOKEN_PREFIX}{user}")
}

/// The user a token authenticates, if it is well-formed
pub fn user_for_token(token: &str) -> Option<UserId> {
    token
        .strip_prefix(TOKEN_PREFIX)
        .filter(|user| !user.is_empty())
        .map(UserId::from)
}

pub fn note(id: u64, ticket_id: u64, author: &str, body: &str) -> Note {
    Note::new(
        EntityId::new(id),
        EntityId::new(ticket_id),
        UserId::from(author),
        body.to_string(),
    )
}

pub fn subtask(id: u64, ticket_id: u64, title: &str, position: u32) -> Subtask {
    Subtask::new(
        EntityId::new(id),
        EntityId::new(ticket_id),
        title.to_string(),
        position,
    )
}

pub fn message(id: u64, team_id: u64, author: &str, content: &str) -> TeamMessage {
    TeamMessage::new(
        EntityId::new(id),
        EntityId::new(team_id),
        UserId::from(author),
        content.to_string(),
    )
}

//! Team room
//!
//! Messages of one team channel. Messages are immutable once sent; they
//! change only through reactions and deletion.

use async_trait::async_trait;
use collab_common::CollabError;
use collab_core::{
    DomainError, EntityId, EntityList, EntityRepository, MessageDraft, PresenceStatus, RepoResult,
    RoomId, TeamMessage, UserId,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use validator::Validate;

use super::mount::{LoadState, RoomContext, RoomFeed, RoomMount};
use super::ticket::check_emoji;
use crate::events::InboundEvent;
use crate::protocol::AckPayload;
use crate::router::EntitySink;

struct TeamFeed {
    team_id: EntityId,
    repo: Arc<dyn EntityRepository<TeamMessage>>,
    messages: RwLock<EntityList<TeamMessage>>,
    revision: watch::Sender<u64>,
}

impl EntitySink for TeamFeed {
    fn apply(&self, event: &InboundEvent) -> bool {
        let room = self.room();
        let changed = match event {
            InboundEvent::MessageCreated(message) if message.team_id == self.team_id => {
                self.messages.write().apply_created(message.clone())
            }
            InboundEvent::MessageDeleted(e) if e.team_id == self.team_id => {
                self.messages.write().apply_deleted(e.message_id)
            }
            InboundEvent::ReactionAdded(e) if e.room == room => self
                .messages
                .write()
                .apply_reaction_added(e.entity_id, &e.emoji, &e.user_id),
            InboundEvent::ReactionRemoved(e) if e.room == room => self
                .messages
                .write()
                .apply_reaction_removed(e.entity_id, &e.emoji, &e.user_id),
            _ => false,
        };

        if changed {
            self.revision.send_modify(|rev| *rev += 1);
        }
        changed
    }
}

#[async_trait]
impl RoomFeed for TeamFeed {
    fn room(&self) -> RoomId {
        RoomId::Team(self.team_id)
    }

    async fn load(&self) -> RepoResult<()> {
        let messages = self.repo.list(self.room()).await?;
        self.messages.write().replace_all(messages);
        self.revision.send_modify(|rev| *rev += 1);
        Ok(())
    }

    fn clear(&self) {
        self.messages.write().replace_all(Vec::new());
        self.revision.send_modify(|rev| *rev += 1);
    }
}

/// Live message list for one team channel
pub struct TeamRoom {
    mount: RoomMount<TeamFeed>,
}

impl TeamRoom {
    /// Mount the team's room; loading and joining continue in the background
    pub fn mount(
        ctx: &RoomContext,
        team_id: EntityId,
        messages: Arc<dyn EntityRepository<TeamMessage>>,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        let feed = Arc::new(TeamFeed {
            team_id,
            repo: messages,
            messages: RwLock::new(EntityList::new()),
            revision,
        });

        Self {
            mount: RoomMount::mount(ctx, feed),
        }
    }

    pub fn team_id(&self) -> EntityId {
        self.mount.feed().team_id
    }

    pub fn room(&self) -> RoomId {
        self.mount.room()
    }

    pub fn messages(&self) -> Vec<TeamMessage> {
        self.mount.feed().messages.read().items().to_vec()
    }

    pub fn active_users(&self) -> Vec<UserId> {
        self.mount.active_users()
    }

    pub fn typing_users(&self) -> Vec<UserId> {
        self.mount.typing_users()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.mount.feed().revision.subscribe()
    }

    pub fn load_state(&self) -> LoadState {
        self.mount.load_state()
    }

    pub fn watch_load_state(&self) -> watch::Receiver<LoadState> {
        self.mount.watch_load_state()
    }

    pub async fn loaded(&self) -> LoadState {
        self.mount.loaded().await
    }

    pub fn is_joined(&self) -> bool {
        self.mount.is_joined()
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_mounted()
    }

    /// Send a message; it appears once the server broadcasts it
    pub async fn send_message(&self, draft: MessageDraft) -> Result<TeamMessage, CollabError> {
        draft.validate().map_err(DomainError::from)?;
        self.mount.handle_stop_typing();
        let feed = self.mount.feed();
        Ok(feed.repo.create(self.room(), &draft).await?)
    }

    pub async fn delete_message(&self, id: EntityId) -> Result<(), CollabError> {
        let feed = self.mount.feed();
        Ok(feed.repo.delete(self.room(), id).await?)
    }

    pub async fn toggle_reaction(&self, id: EntityId, emoji: &str) -> Result<(), CollabError> {
        check_emoji(emoji)?;
        let feed = self.mount.feed();
        Ok(feed.repo.toggle_reaction(self.room(), id, emoji).await?)
    }

    pub fn handle_typing(&self) {
        self.mount.handle_typing();
    }

    pub fn handle_stop_typing(&self) {
        self.mount.handle_stop_typing();
    }

    pub fn set_status(&self, status: PresenceStatus) -> Result<(), CollabError> {
        self.mount.set_status(status)
    }

    pub async fn refresh(&self) -> LoadState {
        self.mount.refresh().await
    }

    pub async fn rejoin(&self) -> AckPayload {
        self.mount.rejoin().await
    }

    pub async fn unmount(&self) {
        self.mount.unmount().await;
    }
}

impl std::fmt::Debug for TeamRoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamRoom")
            .field("team_id", &self.team_id())
            .field("messages", &self.mount.feed().messages.read().len())
            .field("load_state", &self.load_state())
            .finish()
    }
}

//! Ticket collaboration
//!
//! Notes and subtasks of one support ticket, kept in sync by server events.
//! Writes go through REST and are never spliced into the lists locally; the
//! matching realtime event does that.

use async_trait::async_trait;
use collab_common::CollabError;
use collab_core::{
    DomainError, Entity, EntityId, EntityList, EntityRepository, Note, NoteDraft, NotePatch,
    PresenceStatus, RepoResult, RoomId, Subtask, SubtaskDraft, SubtaskPatch, UserId,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use validator::Validate;

use super::mount::{LoadState, RoomContext, RoomFeed, RoomMount};
use crate::events::InboundEvent;
use crate::protocol::AckPayload;
use crate::router::EntitySink;

struct TicketFeed {
    ticket_id: EntityId,
    notes_repo: Arc<dyn EntityRepository<Note>>,
    subtasks_repo: Arc<dyn EntityRepository<Subtask>>,
    notes: RwLock<EntityList<Note>>,
    subtasks: RwLock<EntityList<Subtask>>,
    revision: watch::Sender<u64>,
}

impl TicketFeed {
    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    fn in_scope(&self, ticket_id: EntityId) -> bool {
        ticket_id == self.ticket_id
    }
}

impl EntitySink for TicketFeed {
    fn apply(&self, event: &InboundEvent) -> bool {
        let changed = match event {
            InboundEvent::NoteCreated(note) if self.in_scope(note.ticket_id) => {
                self.notes.write().apply_created(note.clone())
            }
            InboundEvent::NoteUpdated(note) if self.in_scope(note.ticket_id) => {
                self.notes.write().apply_updated(note.clone())
            }
            InboundEvent::NoteDeleted(e) if self.in_scope(e.ticket_id) => {
                self.notes.write().apply_deleted(e.note_id)
            }
            InboundEvent::ReactionAdded(e) if e.room == self.room() => self
                .notes
                .write()
                .apply_reaction_added(e.entity_id, &e.emoji, &e.user_id),
            InboundEvent::ReactionRemoved(e) if e.room == self.room() => self
                .notes
                .write()
                .apply_reaction_removed(e.entity_id, &e.emoji, &e.user_id),
            InboundEvent::ChecklistUpdated(subtask) if self.in_scope(subtask.ticket_id) => {
                self.subtasks.write().apply_upserted(subtask.clone()).changed()
            }
            InboundEvent::SubtaskDeleted(e) if self.in_scope(e.ticket_id) => {
                self.subtasks.write().apply_deleted(e.subtask_id)
            }
            _ => false,
        };

        if changed {
            self.bump();
        }
        changed
    }
}

#[async_trait]
impl RoomFeed for TicketFeed {
    fn room(&self) -> RoomId {
        RoomId::Ticket(self.ticket_id)
    }

    async fn load(&self) -> RepoResult<()> {
        let room = self.room();
        let (notes, subtasks) = tokio::try_join!(
            self.notes_repo.list(room),
            self.subtasks_repo.list(room)
        )?;

        self.notes.write().replace_all(notes);
        self.subtasks.write().replace_all(subtasks);
        self.bump();
        Ok(())
    }

    fn clear(&self) {
        self.notes.write().replace_all(Vec::new());
        self.subtasks.write().replace_all(Vec::new());
        self.bump();
    }
}

/// Live notes and subtasks for one ticket
pub struct TicketCollaboration {
    mount: RoomMount<TicketFeed>,
}

impl TicketCollaboration {
    /// Mount the ticket's room; loading and joining continue in the background
    pub fn mount(
        ctx: &RoomContext,
        ticket_id: EntityId,
        notes: Arc<dyn EntityRepository<Note>>,
        subtasks: Arc<dyn EntityRepository<Subtask>>,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        let feed = Arc::new(TicketFeed {
            ticket_id,
            notes_repo: notes,
            subtasks_repo: subtasks,
            notes: RwLock::new(EntityList::new()),
            subtasks: RwLock::new(EntityList::new()),
            revision,
        });

        Self {
            mount: RoomMount::mount(ctx, feed),
        }
    }

    pub fn ticket_id(&self) -> EntityId {
        self.mount.feed().ticket_id
    }

    pub fn room(&self) -> RoomId {
        self.mount.room()
    }

    // === Snapshots ===

    pub fn notes(&self) -> Vec<Note> {
        self.mount.feed().notes.read().items().to_vec()
    }

    pub fn subtasks(&self) -> Vec<Subtask> {
        self.mount.feed().subtasks.read().items().to_vec()
    }

    pub fn note(&self, id: EntityId) -> Option<Note> {
        self.mount.feed().notes.read().get(id).cloned()
    }

    pub fn subtask(&self, id: EntityId) -> Option<Subtask> {
        self.mount.feed().subtasks.read().get(id).cloned()
    }

    pub fn active_users(&self) -> Vec<UserId> {
        self.mount.active_users()
    }

    /// Typing users, without the local user
    pub fn typing_users(&self) -> Vec<UserId> {
        self.mount.typing_users()
    }

    /// Observe list changes; bumps once per applied event or load
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.mount.feed().revision.subscribe()
    }

    pub fn load_state(&self) -> LoadState {
        self.mount.load_state()
    }

    pub fn watch_load_state(&self) -> watch::Receiver<LoadState> {
        self.mount.watch_load_state()
    }

    /// Wait for the initial load and join to resolve
    pub async fn loaded(&self) -> LoadState {
        self.mount.loaded().await
    }

    pub fn is_joined(&self) -> bool {
        self.mount.is_joined()
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_mounted()
    }

    // === Notes ===

    /// Create a note; it appears once the server broadcasts it
    pub async fn create_note(&self, draft: NoteDraft) -> Result<Note, CollabError> {
        draft.validate().map_err(DomainError::from)?;
        let feed = self.mount.feed();
        Ok(feed.notes_repo.create(self.room(), &draft).await?)
    }

    pub async fn update_note(&self, id: EntityId, patch: NotePatch) -> Result<Note, CollabError> {
        patch.validate().map_err(DomainError::from)?;
        let feed = self.mount.feed();
        Ok(feed.notes_repo.update(self.room(), id, &patch).await?)
    }

    pub async fn delete_note(&self, id: EntityId) -> Result<(), CollabError> {
        let feed = self.mount.feed();
        Ok(feed.notes_repo.delete(self.room(), id).await?)
    }

    /// Add or remove the local user's `emoji` on a note
    pub async fn toggle_note_reaction(&self, id: EntityId, emoji: &str) -> Result<(), CollabError> {
        check_emoji(emoji)?;
        let feed = self.mount.feed();
        Ok(feed.notes_repo.toggle_reaction(self.room(), id, emoji).await?)
    }

    // === Subtasks ===

    pub async fn add_subtask(&self, draft: SubtaskDraft) -> Result<Subtask, CollabError> {
        draft.validate().map_err(DomainError::from)?;
        let feed = self.mount.feed();
        Ok(feed.subtasks_repo.create(self.room(), &draft).await?)
    }

    pub async fn update_subtask(
        &self,
        id: EntityId,
        patch: SubtaskPatch,
    ) -> Result<Subtask, CollabError> {
        patch.validate().map_err(DomainError::from)?;
        let feed = self.mount.feed();
        Ok(feed.subtasks_repo.update(self.room(), id, &patch).await?)
    }

    /// Flip a subtask's completion flag as currently mirrored
    pub async fn toggle_subtask(&self, id: EntityId) -> Result<Subtask, CollabError> {
        let completed = self
            .subtask(id)
            .map(|subtask| subtask.completed)
            .ok_or(DomainError::NotFound {
                kind: Subtask::KIND,
                id,
            })?;
        self.update_subtask(id, SubtaskPatch::completed(!completed))
            .await
    }

    pub async fn delete_subtask(&self, id: EntityId) -> Result<(), CollabError> {
        let feed = self.mount.feed();
        Ok(feed.subtasks_repo.delete(self.room(), id).await?)
    }

    // === Presence ===

    /// Call on every keystroke in the note editor
    pub fn handle_typing(&self) {
        self.mount.handle_typing();
    }

    /// Call on blur or submit
    pub fn handle_stop_typing(&self) {
        self.mount.handle_stop_typing();
    }

    pub fn set_status(&self, status: PresenceStatus) -> Result<(), CollabError> {
        self.mount.set_status(status)
    }

    // === Lifecycle ===

    /// Reload notes and subtasks
    pub async fn refresh(&self) -> LoadState {
        self.mount.refresh().await
    }

    /// Retry a failed join
    pub async fn rejoin(&self) -> AckPayload {
        self.mount.rejoin().await
    }

    pub async fn unmount(&self) {
        self.mount.unmount().await;
    }
}

impl std::fmt::Debug for TicketCollaboration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketCollaboration")
            .field("ticket_id", &self.ticket_id())
            .field("notes", &self.mount.feed().notes.read().len())
            .field("subtasks", &self.mount.feed().subtasks.read().len())
            .field("load_state", &self.load_state())
            .finish()
    }
}

pub(super) fn check_emoji(emoji: &str) -> Result<(), DomainError> {
    if emoji.trim().is_empty() {
        return Err(DomainError::ValidationError(
            "emoji: must not be blank".to_string(),
        ));
    }
    Ok(())
}

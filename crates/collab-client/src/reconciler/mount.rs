//! Room mount lifecycle
//!
//! Mounting a room tracks it in the ledger, subscribes its feed to the
//! router, then loads the lists over REST while joining over the realtime
//! session. Unmounting reverses all of it. In-flight work that resolves after
//! an unmount is discarded.

use async_trait::async_trait;
use collab_common::CollabError;
use collab_core::{PresenceStatus, RepoResult, RoomId, SharedLedger, UserId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::typing::{TypingDebouncer, DEFAULT_TYPING_IDLE};
use crate::protocol::AckPayload;
use crate::router::{EntitySink, EventRouter, SubscriptionId};
use crate::session::RealtimeSession;

/// Shared services every mounted room needs
#[derive(Clone)]
pub struct RoomContext {
    pub session: RealtimeSession,
    pub router: Arc<EventRouter>,
    pub typing_idle: Duration,
}

impl RoomContext {
    pub fn new(session: RealtimeSession, router: Arc<EventRouter>) -> Self {
        Self {
            session,
            router,
            typing_idle: DEFAULT_TYPING_IDLE,
        }
    }

    pub fn with_typing_idle(mut self, idle: Duration) -> Self {
        self.typing_idle = idle;
        self
    }

    pub fn ledger(&self) -> &SharedLedger {
        self.router.ledger()
    }
}

impl std::fmt::Debug for RoomContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomContext")
            .field("session", &self.session)
            .field("typing_idle", &self.typing_idle)
            .finish()
    }
}

/// Progress of a room's REST load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    /// The load failed; the lists are empty
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Entity lists of one room
#[async_trait]
pub(crate) trait RoomFeed: EntitySink + 'static {
    fn room(&self) -> RoomId;

    /// Replace every list with a fresh REST load
    async fn load(&self) -> RepoResult<()>;

    /// Empty every list
    fn clear(&self);
}

struct MountShared<F> {
    feed: Arc<F>,
    ctx: RoomContext,
    load_state: watch::Sender<LoadState>,
    mounted: AtomicBool,
}

impl<F: RoomFeed> MountShared<F> {
    async fn load_and_join(self: Arc<Self>) {
        let room = self.feed.room();
        let (loaded, ack) = tokio::join!(self.feed.load(), self.ctx.session.join_room(room));

        if !self.mounted.load(Ordering::SeqCst) {
            tracing::debug!(room = %room, "Mount resolved after unmount, discarding");
            return;
        }

        self.apply_join(room, ack);
        self.finish_load(loaded);
    }

    fn apply_join(&self, room: RoomId, ack: AckPayload) -> AckPayload {
        if ack.success {
            let users = ack.active_users.clone().unwrap_or_default();
            self.ctx.ledger().merge_if_tracked(room, users);
        }
        ack
    }

    fn finish_load(&self, loaded: RepoResult<()>) {
        let room = self.feed.room();
        let state = match loaded {
            Ok(()) => {
                tracing::debug!(room = %room, "Room loaded");
                LoadState::Ready
            }
            Err(e) => {
                tracing::warn!(room = %room, error = %e, "Room load failed");
                self.feed.clear();
                LoadState::Failed(e.to_string())
            }
        };
        self.load_state.send_replace(state);
    }
}

/// One mounted room: ledger entry, router subscription, and typing timer
pub(crate) struct RoomMount<F: RoomFeed> {
    shared: Arc<MountShared<F>>,
    subscription: SubscriptionId,
    typing: TypingDebouncer,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<F: RoomFeed> RoomMount<F> {
    /// Mount `feed`; the load and join run in the background
    pub(crate) fn mount(ctx: &RoomContext, feed: Arc<F>) -> Self {
        let room = feed.room();
        ctx.ledger().init_room(room, Vec::new());

        let sink: Arc<dyn EntitySink> = feed.clone();
        let subscription = ctx.router.subscribe(room, sink);

        let (load_state, _) = watch::channel(LoadState::Loading);
        let shared = Arc::new(MountShared {
            feed,
            ctx: ctx.clone(),
            load_state,
            mounted: AtomicBool::new(true),
        });
        let task = tokio::spawn(Arc::clone(&shared).load_and_join());

        tracing::info!(room = %room, "Room mounted");
        Self {
            shared,
            subscription,
            typing: TypingDebouncer::new(ctx.session.clone(), room, ctx.typing_idle),
            task: Mutex::new(Some(task)),
        }
    }

    pub(crate) fn feed(&self) -> &F {
        &self.shared.feed
    }

    pub(crate) fn room(&self) -> RoomId {
        self.shared.feed.room()
    }

    fn ctx(&self) -> &RoomContext {
        &self.shared.ctx
    }

    // === Load state ===

    pub(crate) fn load_state(&self) -> LoadState {
        self.shared.load_state.borrow().clone()
    }

    pub(crate) fn watch_load_state(&self) -> watch::Receiver<LoadState> {
        self.shared.load_state.subscribe()
    }

    /// Wait until the load has finished one way or the other
    pub(crate) async fn loaded(&self) -> LoadState {
        let mut rx = self.watch_load_state();
        loop {
            let state = rx.borrow_and_update().clone();
            if !state.is_loading() || rx.changed().await.is_err() {
                return state;
            }
        }
    }

    /// Reload every list over REST
    pub(crate) async fn refresh(&self) -> LoadState {
        self.shared.load_state.send_replace(LoadState::Loading);
        let loaded = self.shared.feed.load().await;
        self.shared.finish_load(loaded);
        self.load_state()
    }

    /// Retry a join that was rejected or failed
    pub(crate) async fn rejoin(&self) -> AckPayload {
        let room = self.room();
        let ack = self.ctx().session.join_room(room).await;
        self.shared.apply_join(room, ack)
    }

    pub(crate) fn is_joined(&self) -> bool {
        self.ctx().session.joined_rooms().contains(&self.room())
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.shared.mounted.load(Ordering::SeqCst)
    }

    // === Presence ===

    pub(crate) fn active_users(&self) -> Vec<UserId> {
        self.ctx().ledger().active_users(self.room())
    }

    /// Typing users other than the local user
    pub(crate) fn typing_users(&self) -> Vec<UserId> {
        let me = self.ctx().session.user_id();
        let mut users = self.ctx().ledger().typing_users(self.room());
        users.retain(|user| Some(user) != me.as_ref());
        users
    }

    pub(crate) fn handle_typing(&self) {
        self.typing.keystroke();
    }

    pub(crate) fn handle_stop_typing(&self) {
        self.typing.stop();
    }

    /// Publish the local user's status and mirror it locally
    pub(crate) fn set_status(&self, status: PresenceStatus) -> Result<(), CollabError> {
        let room = self.room();
        self.ctx().session.update_presence(room, status)?;

        if let Some(me) = self.ctx().session.user_id() {
            self.ctx().ledger().update(|ledger| {
                if ledger.has_room(room) {
                    ledger.update_room_presence(room, &me, status);
                }
            });
        }
        Ok(())
    }

    // === Teardown ===

    /// Leave the room and drop all local state for it
    pub(crate) async fn unmount(&self) {
        if !self.teardown() {
            return;
        }

        let room = self.room();
        let ack = self.ctx().session.leave_room(room).await;
        tracing::info!(room = %room, left = ack.success, "Room unmounted");
    }

    /// Local half of an unmount; `false` if already torn down
    fn teardown(&self) -> bool {
        if !self.shared.mounted.swap(false, Ordering::SeqCst) {
            return false;
        }

        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
        self.typing.stop();

        let room = self.room();
        self.ctx().router.unsubscribe(room, self.subscription);
        self.ctx().ledger().remove_room_state(room);
        true
    }
}

impl<F: RoomFeed> Drop for RoomMount<F> {
    fn drop(&mut self) {
        if !self.teardown() {
            return;
        }

        let room = self.room();
        let session = self.ctx().session.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let _ack = session.leave_room(room).await;
                });
            }
            Err(_) => tracing::debug!(room = %room, "No runtime to leave room on drop"),
        }
        tracing::info!(room = %room, "Room dropped without unmount");
    }
}

//! Shared ledger handle
//!
//! One `SharedLedger` is constructed per process and injected into every
//! consumer. Each mutation bumps a revision on a `watch` channel exactly once,
//! after the write lock is released, so observers see the new state on their
//! next read.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;

use super::{PresenceLedger, PresenceStatus};
use crate::value_objects::{RoomId, UserId};

/// Cloneable, observable handle to a `PresenceLedger`
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<PresenceLedger>>,
    revision: Arc<watch::Sender<u64>>,
}

impl SharedLedger {
    /// Create a handle around an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::from_ledger(PresenceLedger::new())
    }

    /// Create a handle around an existing ledger
    #[must_use]
    pub fn from_ledger(ledger: PresenceLedger) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(ledger)),
            revision: Arc::new(revision),
        }
    }

    /// Apply a mutation and notify observers once
    pub fn update<R>(&self, f: impl FnOnce(&mut PresenceLedger) -> R) -> R {
        let result = {
            let mut ledger = self.inner.write();
            f(&mut ledger)
        };
        self.revision.send_modify(|rev| *rev += 1);
        result
    }

    /// Read the ledger without notifying
    pub fn read<R>(&self, f: impl FnOnce(&PresenceLedger) -> R) -> R {
        f(&self.inner.read())
    }

    /// Clone the current ledger state
    pub fn snapshot(&self) -> PresenceLedger {
        self.inner.read().clone()
    }

    /// Observe mutations; the value is the mutation count
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current mutation count
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    // === Ledger operations ===

    pub fn set_global_presence(&self, user_id: &UserId, status: PresenceStatus) {
        self.update(|ledger| ledger.set_global_presence(user_id, status));
    }

    pub fn init_room<I>(&self, room: RoomId, initial_users: I)
    where
        I: IntoIterator<Item = UserId>,
    {
        self.update(|ledger| ledger.init_room(room, initial_users));
    }

    pub fn user_joined_room(&self, room: RoomId, user_id: &UserId) {
        self.update(|ledger| ledger.user_joined_room(room, user_id));
    }

    pub fn user_left_room(&self, room: RoomId, user_id: &UserId) {
        self.update(|ledger| ledger.user_left_room(room, user_id));
    }

    pub fn update_room_presence(&self, room: RoomId, user_id: &UserId, status: PresenceStatus) {
        self.update(|ledger| ledger.update_room_presence(room, user_id, status));
    }

    pub fn set_typing(&self, room: RoomId, user_id: &UserId, is_typing: bool) {
        self.update(|ledger| ledger.set_typing(room, user_id, is_typing));
    }

    pub fn clear_typing(&self, room: RoomId, user_id: &UserId) {
        self.update(|ledger| ledger.clear_typing(room, user_id));
    }

    pub fn remove_room_state(&self, room: RoomId) -> bool {
        self.update(|ledger| ledger.remove_room_state(room))
    }

    /// Refresh `last_seen` for a user observed doing something
    pub fn touch_presence(&self, user_id: &UserId, now: DateTime<Utc>) {
        self.update(|ledger| ledger.touch_presence(user_id, now));
    }

    /// Apply a mutation only while `room` is tracked
    ///
    /// The check and the mutation share one write lock, so a concurrent
    /// `remove_room_state` is never undone. Returns `None` (and does not
    /// notify) when the room is gone.
    pub fn update_if_tracked<R>(
        &self,
        room: RoomId,
        f: impl FnOnce(&mut PresenceLedger) -> R,
    ) -> Option<R> {
        let result = {
            let mut ledger = self.inner.write();
            if !ledger.has_room(room) {
                return None;
            }
            f(&mut ledger)
        };
        self.revision.send_modify(|rev| *rev += 1);
        Some(result)
    }

    /// Union `users` into a room only if it is still tracked
    ///
    /// Used when an acknowledgement resolves after the owner may have torn the
    /// room down. Returns `false` when the room is gone.
    pub fn merge_if_tracked(&self, room: RoomId, users: Vec<UserId>) -> bool {
        self.update_if_tracked(room, |ledger| ledger.init_room(room, users))
            .is_some()
    }

    /// Run both staleness sweeps; notifies only if something changed
    pub fn sweep(&self, now: DateTime<Utc>, typing_ttl: Duration, presence_ttl: Duration) -> SweepReport {
        let report = {
            let mut ledger = self.inner.write();
            SweepReport {
                typing_evicted: ledger.evict_stale_typing(now, typing_ttl),
                presence_expired: ledger.expire_stale_presence(now, presence_ttl),
            }
        };

        if !report.is_empty() {
            self.revision.send_modify(|rev| *rev += 1);
        }
        report
    }

    // === Queries ===

    pub fn has_room(&self, room: RoomId) -> bool {
        self.read(|ledger| ledger.has_room(room))
    }

    pub fn active_users(&self, room: RoomId) -> Vec<UserId> {
        self.read(|ledger| ledger.active_users(room))
    }

    pub fn typing_users(&self, room: RoomId) -> Vec<UserId> {
        self.read(|ledger| ledger.typing_users(room))
    }

    pub fn status_of(&self, user_id: &UserId) -> PresenceStatus {
        self.read(|ledger| ledger.status_of(user_id))
    }
}

impl Default for SharedLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ledger = self.inner.read();
        f.debug_struct("SharedLedger")
            .field("users", &ledger.user_count())
            .field("rooms", &ledger.rooms().count())
            .field("revision", &self.revision())
            .finish()
    }
}

/// Result of a staleness sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub typing_evicted: usize,
    pub presence_expired: Vec<UserId>,
}

impl SweepReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.typing_evicted == 0 && self.presence_expired.is_empty()
    }
}

//! Presence ledger
//!
//! In-memory map of global user presence and per-room membership/typing sets.
//! Every operation is synchronous and performs no I/O. Rooms are created lazily
//! on first reference and only ever removed by `remove_room_state`.

use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};

use super::{PresenceRecord, PresenceStatus, TypingEntry};
use crate::value_objects::{RoomId, UserId};

/// Membership and typing state of a single room
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomState {
    active_users: HashSet<UserId>,
    typing_users: HashMap<UserId, TypingEntry>,
}

impl RoomState {
    /// Users currently joined to the room
    pub fn active_users(&self) -> &HashSet<UserId> {
        &self.active_users
    }

    /// Users currently typing in the room
    pub fn typing_users(&self) -> &HashMap<UserId, TypingEntry> {
        &self.typing_users
    }

    #[inline]
    pub fn is_active(&self, user_id: &UserId) -> bool {
        self.active_users.contains(user_id)
    }

    #[inline]
    pub fn is_typing(&self, user_id: &UserId) -> bool {
        self.typing_users.contains_key(user_id)
    }
}

/// Global presence records plus per-room state
#[derive(Debug, Clone, Default)]
pub struct PresenceLedger {
    global: HashMap<UserId, PresenceRecord>,
    rooms: HashMap<RoomId, RoomState>,
}

impl PresenceLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Upsert the global presence record for a user, stamping `last_seen`
    pub fn set_global_presence(&mut self, user_id: &UserId, status: PresenceStatus) {
        let now = Utc::now();
        self.global
            .entry(user_id.clone())
            .and_modify(|record| {
                record.status = status;
                record.last_seen = now;
            })
            .or_insert_with(|| PresenceRecord::new(user_id.clone(), status, now));
    }

    /// Create the room if absent; otherwise union its membership with `initial_users`
    ///
    /// Listed users are joined, so any without a present global record become
    /// `Online`. An existing away/busy status is kept.
    pub fn init_room<I>(&mut self, room: RoomId, initial_users: I)
    where
        I: IntoIterator<Item = UserId>,
    {
        let now = Utc::now();
        let state = self.rooms.entry(room).or_default();

        for user_id in initial_users {
            match self.global.get_mut(&user_id) {
                Some(record) if record.status.is_present() => {}
                Some(record) => {
                    record.status = PresenceStatus::Online;
                    record.last_seen = now;
                }
                None => {
                    self.global.insert(
                        user_id.clone(),
                        PresenceRecord::new(user_id.clone(), PresenceStatus::Online, now),
                    );
                }
            }
            state.active_users.insert(user_id);
        }
    }

    /// Add a user to a room. A join always implies the user is globally online.
    pub fn user_joined_room(&mut self, room: RoomId, user_id: &UserId) {
        self.room_mut(room).active_users.insert(user_id.clone());
        self.set_global_presence(user_id, PresenceStatus::Online);
    }

    /// Remove a user (and their typing entry) from a room. Global presence is untouched.
    pub fn user_left_room(&mut self, room: RoomId, user_id: &UserId) {
        if let Some(state) = self.rooms.get_mut(&room) {
            state.active_users.remove(user_id);
            state.typing_users.remove(user_id);
        }
    }

    /// Apply an explicit status broadcast for a user in a room
    ///
    /// `Offline` removes the user from the room; any other status ensures membership.
    /// Global presence is always set to `status`.
    pub fn update_room_presence(&mut self, room: RoomId, user_id: &UserId, status: PresenceStatus) {
        if status == PresenceStatus::Offline {
            if let Some(state) = self.rooms.get_mut(&room) {
                state.active_users.remove(user_id);
            }
        } else {
            self.room_mut(room).active_users.insert(user_id.clone());
        }

        self.set_global_presence(user_id, status);
    }

    /// Insert a typing entry when `is_typing`, otherwise delete it
    pub fn set_typing(&mut self, room: RoomId, user_id: &UserId, is_typing: bool) {
        if is_typing {
            self.room_mut(room)
                .typing_users
                .insert(user_id.clone(), TypingEntry::started(Utc::now()));
        } else {
            self.clear_typing(room, user_id);
        }
    }

    /// Unconditionally remove a typing entry
    pub fn clear_typing(&mut self, room: RoomId, user_id: &UserId) {
        if let Some(state) = self.rooms.get_mut(&room) {
            state.typing_users.remove(user_id);
        }
    }

    /// Delete a room entirely. Global presence records are kept.
    ///
    /// Returns `true` if the room existed.
    pub fn remove_room_state(&mut self, room: RoomId) -> bool {
        self.rooms.remove(&room).is_some()
    }

    /// Refresh `last_seen` for a known user without changing their status
    pub fn touch_presence(&mut self, user_id: &UserId, now: DateTime<Utc>) {
        if let Some(record) = self.global.get_mut(user_id) {
            record.last_seen = now;
        }
    }

    /// Drop typing entries that started more than `ttl` before `now`
    ///
    /// Covers lost stop signals. Returns the number of entries removed.
    pub fn evict_stale_typing(&mut self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let cutoff = now - ttl;
        let mut evicted = 0;

        for state in self.rooms.values_mut() {
            let before = state.typing_users.len();
            state.typing_users.retain(|_, entry| entry.since > cutoff);
            evicted += before - state.typing_users.len();
        }

        evicted
    }

    /// Mark users unseen for longer than `ttl` as offline
    ///
    /// Room membership is owned by the server: a user joined to any tracked
    /// room stays present until a `user_left` or offline broadcast removes
    /// them, however quiet they are. Only records of users outside every
    /// tracked room expire. Returns the expired users.
    pub fn expire_stale_presence(&mut self, now: DateTime<Utc>, ttl: Duration) -> Vec<UserId> {
        let cutoff = now - ttl;
        let joined: HashSet<&UserId> = self
            .rooms
            .values()
            .flat_map(|state| state.active_users.iter())
            .collect();

        let mut expired = Vec::new();
        for record in self.global.values_mut() {
            if record.status.is_present()
                && record.last_seen <= cutoff
                && !joined.contains(&record.user_id)
            {
                record.status = PresenceStatus::Offline;
                expired.push(record.user_id.clone());
            }
        }

        expired.sort();
        expired
    }

    fn room_mut(&mut self, room: RoomId) -> &mut RoomState {
        self.rooms.entry(room).or_default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get a user's global presence record
    pub fn presence(&self, user_id: &UserId) -> Option<&PresenceRecord> {
        self.global.get(user_id)
    }

    /// Get a user's status, `Offline` if never observed
    pub fn status_of(&self, user_id: &UserId) -> PresenceStatus {
        self.global
            .get(user_id)
            .map(|record| record.status)
            .unwrap_or_default()
    }

    /// Get a room's state
    pub fn room(&self, room: RoomId) -> Option<&RoomState> {
        self.rooms.get(&room)
    }

    /// Check whether a room is currently tracked
    pub fn has_room(&self, room: RoomId) -> bool {
        self.rooms.contains_key(&room)
    }

    /// Sorted members of a room (empty if the room is unknown)
    pub fn active_users(&self, room: RoomId) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .rooms
            .get(&room)
            .map(|state| state.active_users.iter().cloned().collect())
            .unwrap_or_default();
        users.sort();
        users
    }

    /// Sorted typing users of a room (empty if the room is unknown)
    pub fn typing_users(&self, room: RoomId) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .rooms
            .get(&room)
            .map(|state| state.typing_users.keys().cloned().collect())
            .unwrap_or_default();
        users.sort();
        users
    }

    /// All tracked rooms
    pub fn rooms(&self) -> impl Iterator<Item = &RoomId> {
        self.rooms.keys()
    }

    /// Number of users with a global presence record
    pub fn user_count(&self) -> usize {
        self.global.len()
    }
}

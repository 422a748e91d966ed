//! Typing debounce
//!
//! Every keystroke sends a start signal and re-arms one idle timer per room.
//! If the timer fires before the next keystroke, a stop signal goes out.

use collab_core::RoomId;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::session::RealtimeSession;

/// Idle time before an automatic stop signal
pub const DEFAULT_TYPING_IDLE: Duration = Duration::from_secs(3);

/// Single cancellable typing timer for one room
pub struct TypingDebouncer {
    room: RoomId,
    session: RealtimeSession,
    idle: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl TypingDebouncer {
    pub fn new(session: RealtimeSession, room: RoomId, idle: Duration) -> Self {
        Self {
            room,
            session,
            idle,
            timer: Mutex::new(None),
        }
    }

    /// Record a keystroke
    pub fn keystroke(&self) {
        if let Err(e) = self.session.send_typing_start(self.room) {
            tracing::debug!(room = %self.room, error = %e, "Typing start not sent");
        }

        let session = self.session.clone();
        let room = self.room;
        let idle = self.idle;

        let mut timer = self.timer.lock();
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(idle).await;
            tracing::trace!(room = %room, "Typing idle, sending stop");
            if let Err(e) = session.send_typing_stop(room) {
                tracing::debug!(room = %room, error = %e, "Typing stop not sent");
            }
        }));
    }

    /// Stop typing now; returns `false` if the user was not typing
    pub fn stop(&self) -> bool {
        let Some(timer) = self.timer.lock().take() else {
            return false;
        };
        let was_typing = !timer.is_finished();
        timer.abort();

        if was_typing {
            if let Err(e) = self.session.send_typing_stop(self.room) {
                tracing::debug!(room = %self.room, error = %e, "Typing stop not sent");
            }
        }
        was_typing
    }

    /// Check if a stop signal is still owed
    pub fn is_active(&self) -> bool {
        self.timer
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for TypingDebouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().take() {
            timer.abort();
        }
    }
}

impl std::fmt::Debug for TypingDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypingDebouncer")
            .field("room", &self.room)
            .field("idle", &self.idle)
            .field("active", &self.is_active())
            .finish()
    }
}

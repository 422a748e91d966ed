//! Event router
//!
//! Consumes decoded server events from the session and applies them: presence
//! events mutate the shared ledger, entity events go to the sinks subscribed
//! to the event's room. Events for rooms nobody tracks are dropped.

use chrono::Utc;
use collab_core::{RoomId, SharedLedger};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::InboundEvent;
use crate::session::{RealtimeSession, SessionEvent};

/// Receives entity events for one room
///
/// Implementations are pure appliers over their own list; the router has
/// already checked the room.
pub trait EntitySink: Send + Sync {
    /// Apply an event; returns `true` if anything changed
    fn apply(&self, event: &InboundEvent) -> bool;
}

/// Identifies one sink registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type SinkList = Vec<(SubscriptionId, Arc<dyn EntitySink>)>;

/// Routes inbound events to the ledger and to room-scoped sinks
pub struct EventRouter {
    ledger: SharedLedger,
    sinks: DashMap<RoomId, SinkList>,
    next_id: AtomicU64,
    running: AtomicBool,
    generation: AtomicU64,
    shutdown: Mutex<CancellationToken>,
}

impl EventRouter {
    pub fn new(ledger: SharedLedger) -> Self {
        Self {
            ledger,
            sinks: DashMap::new(),
            next_id: AtomicU64::new(1),
            running: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            shutdown: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    // === Subscriptions ===

    /// Deliver entity events for `room` to `sink`
    pub fn subscribe(&self, room: RoomId, sink: Arc<dyn EntitySink>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.sinks.entry(room).or_default().push((id, sink));
        tracing::debug!(room = %room, "Sink subscribed");
        id
    }

    /// Stop delivering to a sink; returns `false` if it was not registered
    pub fn unsubscribe(&self, room: RoomId, id: SubscriptionId) -> bool {
        let removed = match self.sinks.get_mut(&room) {
            Some(mut list) => {
                let before = list.len();
                list.retain(|(sub, _)| *sub != id);
                before != list.len()
            }
            None => false,
        };
        self.sinks.remove_if(&room, |_, list| list.is_empty());

        if removed {
            tracing::debug!(room = %room, "Sink unsubscribed");
        }
        removed
    }

    /// Number of sinks registered for `room`
    pub fn subscriber_count(&self, room: RoomId) -> usize {
        self.sinks.get(&room).map_or(0, |list| list.len())
    }

    // === Routing ===

    /// Apply one event; returns `true` if the ledger or a sink changed
    pub fn dispatch(&self, event: &InboundEvent) -> bool {
        let Some(room) = event.room() else {
            tracing::trace!(event = %event.event_type(), "Unscoped event, ignoring");
            return false;
        };

        tracing::trace!(event = %event.event_type(), room = %room, "Routing event");

        if event.is_presence_event() {
            self.apply_presence(room, event)
        } else {
            self.apply_entity(room, event)
        }
    }

    fn apply_presence(&self, room: RoomId, event: &InboundEvent) -> bool {
        let now = Utc::now();
        let applied = self.ledger.update_if_tracked(room, |ledger| {
            match event {
                InboundEvent::UserJoined(e) => {
                    ledger.init_room(room, e.active_users.iter().cloned());
                    ledger.user_joined_room(room, &e.user_id);
                }
                InboundEvent::UserLeft(e) => ledger.user_left_room(room, &e.user_id),
                InboundEvent::PresenceChanged(e) => {
                    ledger.update_room_presence(room, &e.user_id, e.status);
                }
                InboundEvent::TypingIndicator(e) => {
                    ledger.set_typing(room, &e.user_id, e.is_typing);
                }
                _ => return false,
            }
            if let Some(actor) = event.actor() {
                ledger.touch_presence(actor, now);
            }
            true
        });

        applied.unwrap_or_else(|| {
            tracing::debug!(
                event = %event.event_type(),
                room = %room,
                "Presence event for untracked room, dropping"
            );
            false
        })
    }

    fn apply_entity(&self, room: RoomId, event: &InboundEvent) -> bool {
        // Clone the sinks out so a sink can unsubscribe from inside `apply`
        let sinks: Vec<Arc<dyn EntitySink>> = match self.sinks.get(&room) {
            Some(list) => list.iter().map(|(_, sink)| Arc::clone(sink)).collect(),
            None => {
                tracing::trace!(
                    event = %event.event_type(),
                    room = %room,
                    "No subscriber for room, dropping"
                );
                return false;
            }
        };

        let mut changed = false;
        for sink in sinks {
            changed |= sink.apply(event);
        }
        changed
    }

    /// React to session lifecycle changes
    pub fn handle_lifecycle(&self, event: &SessionEvent) {
        if let SessionEvent::Rejoined { room, active_users } = event {
            if !self.ledger.merge_if_tracked(*room, active_users.clone()) {
                tracing::debug!(room = %room, "Re-join ack for unmounted room, skipping");
            }
        }
    }

    // === Background loop ===

    /// Start consuming the session's events
    ///
    /// Spawns a background task; a second call while running is a no-op.
    /// The router can be started again after `stop`.
    pub fn start(self: Arc<Self>, session: &RealtimeSession) -> Option<JoinHandle<()>> {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Event router is already running");
            return None;
        }

        let shutdown = CancellationToken::new();
        *self.shutdown.lock() = shutdown.clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let events = session.subscribe_events();
        let lifecycle = session.subscribe_lifecycle();
        let router = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            router.run(events, lifecycle, shutdown, generation).await;
        });

        tracing::info!("Event router started");
        Some(handle)
    }

    /// Stop the background loop
    pub fn stop(&self) {
        self.shutdown.lock().cancel();
        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Event router stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(
        &self,
        mut events: broadcast::Receiver<InboundEvent>,
        mut lifecycle: broadcast::Receiver<SessionEvent>,
        shutdown: CancellationToken,
        generation: u64,
    ) {
        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,

                received = events.recv() => match received {
                    Ok(event) => {
                        self.dispatch(&event);
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "Event router lagged behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::warn!("Event channel closed");
                        break;
                    }
                },

                received = lifecycle.recv() => match received {
                    Ok(event) => self.handle_lifecycle(&event),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "Lifecycle receiver lagged behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }

        // A newer loop may already own the flag
        if self.generation.load(Ordering::SeqCst) == generation {
            self.running.store(false, Ordering::SeqCst);
        }
        tracing::info!("Event router loop ended");
    }
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("rooms", &self.sinks.len())
            .field("running", &self.is_running())
            .finish()
    }
}

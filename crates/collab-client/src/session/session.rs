//! Realtime session
//!
//! One `RealtimeSession` owns the physical connection every mounted room
//! shares. A driver task runs the handshake, heartbeats, and reconnects; the
//! public API sends requests and emits through whichever connection is live.

use collab_common::{ClientConfig, Credentials};
use collab_core::{PresenceStatus, RoomId, UserId};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::{ConnectionState, ReconnectPolicy, SessionError, SessionEvent, SessionLease};
use crate::events::{EventType, InboundEvent, ReadyEvent};
use crate::protocol::{
    AckPayload, CloseCode, GatewayMessage, IdentifyPayload, IdentifyProperties, OpCode,
    PresenceUpdatePayload, RoomRequest, TypingPayload,
};
use crate::transport::{Channel, Connector, TransportEvent};

/// Buffered inbound events per subscriber
const EVENT_BUFFER_SIZE: usize = 256;

/// Buffered lifecycle events per subscriber
const LIFECYCLE_BUFFER_SIZE: usize = 64;

/// Timing and retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub policy: ReconnectPolicy,
    pub request_timeout: Duration,
    pub handshake_timeout: Duration,
}

impl SessionOptions {
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            policy: ReconnectPolicy::from(&config.reconnect),
            request_timeout: config.timeouts.request(),
            handshake_timeout: config.timeouts.handshake(),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            policy: ReconnectPolicy::default(),
            request_timeout: Duration::from_secs(10),
            handshake_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Clone)]
struct Target {
    endpoint: String,
    credentials: Credentials,
}

struct Driver {
    generation: u64,
    cancel: CancellationToken,
}

type PendingReply = oneshot::Sender<Result<AckPayload, SessionError>>;

struct Inner {
    connector: Arc<dyn Connector>,
    options: SessionOptions,
    target: Mutex<Option<Target>>,
    state: watch::Sender<ConnectionState>,
    lifecycle: broadcast::Sender<SessionEvent>,
    events: broadcast::Sender<InboundEvent>,
    outbound: Mutex<Option<mpsc::Sender<String>>>,
    pending: DashMap<u64, PendingReply>,
    next_request_id: AtomicU64,
    joined_rooms: Mutex<BTreeSet<RoomId>>,
    leases: AtomicUsize,
    driver: Mutex<Option<Driver>>,
    generation: AtomicU64,
    last_error: Mutex<Option<SessionError>>,
    user_id: Mutex<Option<UserId>>,
}

/// Shared realtime connection
///
/// Cloning is cheap; all clones drive the same connection.
#[derive(Clone)]
pub struct RealtimeSession {
    inner: Arc<Inner>,
}

impl RealtimeSession {
    /// Create a session without a target; call `connect_with` or `set_target`
    pub fn new(connector: Arc<dyn Connector>, options: SessionOptions) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (lifecycle, _) = broadcast::channel(LIFECYCLE_BUFFER_SIZE);
        let (events, _) = broadcast::channel(EVENT_BUFFER_SIZE);

        Self {
            inner: Arc::new(Inner {
                connector,
                options,
                target: Mutex::new(None),
                state,
                lifecycle,
                events,
                outbound: Mutex::new(None),
                pending: DashMap::new(),
                next_request_id: AtomicU64::new(1),
                joined_rooms: Mutex::new(BTreeSet::new()),
                leases: AtomicUsize::new(0),
                driver: Mutex::new(None),
                generation: AtomicU64::new(0),
                last_error: Mutex::new(None),
                user_id: Mutex::new(None),
            }),
        }
    }

    /// Endpoint and credentials used by the next connect
    pub fn set_target(&self, endpoint: impl Into<String>, credentials: Credentials) {
        *self.inner.target.lock() = Some(Target {
            endpoint: endpoint.into(),
            credentials,
        });
    }

    // === Lifecycle ===

    /// Set the target and connect
    pub async fn connect_with(
        &self,
        endpoint: impl Into<String>,
        credentials: Credentials,
    ) -> Result<(), SessionError> {
        self.set_target(endpoint, credentials);
        self.connect().await
    }

    /// Connect to the configured target
    ///
    /// Idempotent: while a connection is up or being retried, this waits for
    /// it instead of opening another. Resolves once the handshake completes,
    /// or with the terminal error once retries are exhausted.
    pub async fn connect(&self) -> Result<(), SessionError> {
        let mut state_rx = self.inner.state.subscribe();
        self.start_driver()?;

        loop {
            match *state_rx.borrow_and_update() {
                ConnectionState::Connected => return Ok(()),
                ConnectionState::Disconnected => {
                    return Err(self.last_error().unwrap_or(SessionError::NotConnected));
                }
                ConnectionState::Connecting | ConnectionState::Reconnecting => {}
            }
            if state_rx.changed().await.is_err() {
                return Err(SessionError::NotConnected);
            }
        }
    }

    fn start_driver(&self) -> Result<(), SessionError> {
        let mut slot = self.inner.driver.lock();
        if slot.is_some() {
            return Ok(());
        }

        let target = self
            .inner
            .target
            .lock()
            .clone()
            .ok_or(SessionError::MissingCredentials)?;

        let cancel = CancellationToken::new();
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *slot = Some(Driver {
            generation,
            cancel: cancel.clone(),
        });
        *self.inner.last_error.lock() = None;
        self.inner.state.send_replace(ConnectionState::Connecting);
        drop(slot);

        tracing::info!(endpoint = %target.endpoint, "Connecting realtime session");
        tokio::spawn(run_driver(Arc::clone(&self.inner), target, cancel, generation));
        Ok(())
    }

    /// Close the connection and stop reconnecting
    ///
    /// Pending requests fail immediately and tracked rooms are forgotten.
    pub fn disconnect(&self) {
        let driver = {
            let mut slot = self.inner.driver.lock();
            let driver = slot.take();
            self.inner.state.send_replace(ConnectionState::Disconnected);
            driver
        };

        let Some(driver) = driver else {
            return;
        };

        driver.cancel.cancel();
        self.inner.outbound.lock().take();
        self.inner.fail_pending(&SessionError::NotConnected);
        self.inner.joined_rooms.lock().clear();

        tracing::info!("Realtime session disconnected");
        self.inner.emit(SessionEvent::Disconnected {
            reason: "client disconnect".to_string(),
        });
    }

    /// Take a lease, connecting if this is the first one
    ///
    /// The connection closes when the last lease is dropped.
    pub async fn acquire(&self) -> Result<SessionLease, SessionError> {
        let previous = self.inner.leases.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(leases = previous + 1, "Session lease acquired");
        let lease = SessionLease::new(self.clone());

        self.connect().await?;
        Ok(lease)
    }

    pub(super) fn release_lease(&self) {
        let previous = self.inner.leases.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(leases = previous - 1, "Session lease released");
        if previous == 1 {
            self.disconnect();
        }
    }

    /// Number of live leases
    pub fn lease_count(&self) -> usize {
        self.inner.leases.load(Ordering::SeqCst)
    }

    // === Room requests ===

    /// Join a room; failures come back as `success: false`
    pub async fn join_room(&self, room: RoomId) -> AckPayload {
        soften(room, EventType::JoinRoom, self.join_room_with(room, None).await)
    }

    /// Join a room with an optional cancellation token
    ///
    /// A successful join is tracked and re-joined after reconnects.
    pub async fn join_room_with(
        &self,
        room: RoomId,
        cancel: Option<&CancellationToken>,
    ) -> Result<AckPayload, SessionError> {
        let ack = self.room_request(EventType::JoinRoom, room, cancel).await?;
        if ack.success {
            self.inner.joined_rooms.lock().insert(room);
        }
        Ok(ack)
    }

    /// Leave a room; failures come back as `success: false`
    pub async fn leave_room(&self, room: RoomId) -> AckPayload {
        soften(room, EventType::LeaveRoom, self.leave_room_with(room, None).await)
    }

    /// Leave a room with an optional cancellation token
    ///
    /// The room stops being tracked before the request is sent.
    pub async fn leave_room_with(
        &self,
        room: RoomId,
        cancel: Option<&CancellationToken>,
    ) -> Result<AckPayload, SessionError> {
        self.inner.joined_rooms.lock().remove(&room);
        self.room_request(EventType::LeaveRoom, room, cancel).await
    }

    async fn room_request(
        &self,
        event: EventType,
        room: RoomId,
        cancel: Option<&CancellationToken>,
    ) -> Result<AckPayload, SessionError> {
        let data = encode(RoomRequest { room })?;
        let ack = self.request(event, data, cancel).await?;
        if !ack.success {
            tracing::warn!(
                room = %room,
                event = %event,
                error = ack.error.as_deref().unwrap_or("unknown"),
                "Room request rejected"
            );
        }
        Ok(ack)
    }

    /// Send a request and wait for its acknowledgement
    ///
    /// Bounded by the request timeout. A dropped connection fails the request
    /// immediately with `ConnectionLost`.
    pub async fn request(
        &self,
        event: EventType,
        data: Value,
        cancel: Option<&CancellationToken>,
    ) -> Result<AckPayload, SessionError> {
        let outbound = self.outbound()?;
        let id = self.inner.next_request_id.fetch_add(1, Ordering::SeqCst);
        let frame = GatewayMessage::request(event, id, data)
            .to_json()
            .map_err(|e| SessionError::Encode(e.to_string()))?;

        let (reply_tx, reply_rx) = oneshot::channel();
        self.inner.pending.insert(id, reply_tx);
        let _guard = PendingGuard {
            pending: &self.inner.pending,
            id,
        };

        tracing::trace!(event = %event, id, "Sending request");
        outbound
            .send(frame)
            .await
            .map_err(|_| SessionError::NotConnected)?;

        let reply = tokio::time::timeout(self.inner.options.request_timeout, reply_rx);
        let outcome = match cancel {
            Some(token) => tokio::select! {
                () = token.cancelled() => return Err(SessionError::Cancelled),
                outcome = reply => outcome,
            },
            None => reply.await,
        };

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(SessionError::ConnectionLost),
            Err(_) => {
                tracing::warn!(event = %event, id, "Request timed out");
                Err(SessionError::Timeout)
            }
        }
    }

    // === Emits ===

    /// Announce that the local user started typing in `room`
    pub fn send_typing_start(&self, room: RoomId) -> Result<(), SessionError> {
        self.emit(
            EventType::TypingStart,
            TypingPayload {
                room,
                is_typing: true,
            },
        )
    }

    /// Announce that the local user stopped typing in `room`
    pub fn send_typing_stop(&self, room: RoomId) -> Result<(), SessionError> {
        self.emit(
            EventType::TypingStop,
            TypingPayload {
                room,
                is_typing: false,
            },
        )
    }

    /// Publish the local user's status in `room`
    pub fn update_presence(&self, room: RoomId, status: PresenceStatus) -> Result<(), SessionError> {
        self.emit(EventType::PresenceUpdate, PresenceUpdatePayload { room, status })
    }

    /// Fire-and-forget; never waits on the outbound queue
    fn emit(&self, event: EventType, payload: impl Serialize) -> Result<(), SessionError> {
        let outbound = self.outbound()?;
        let frame = GatewayMessage::emit(event, encode(payload)?)
            .to_json()
            .map_err(|e| SessionError::Encode(e.to_string()))?;

        outbound.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SessionError::Backpressure,
            mpsc::error::TrySendError::Closed(_) => SessionError::NotConnected,
        })
    }

    fn outbound(&self) -> Result<mpsc::Sender<String>, SessionError> {
        self.inner
            .outbound
            .lock()
            .clone()
            .ok_or(SessionError::NotConnected)
    }

    // === Observers ===

    /// Decoded server events
    pub fn subscribe_events(&self) -> broadcast::Receiver<InboundEvent> {
        self.inner.events.subscribe()
    }

    /// Connection lifecycle events
    pub fn subscribe_lifecycle(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.lifecycle.subscribe()
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// The authenticated user, once a handshake has completed
    pub fn user_id(&self) -> Option<UserId> {
        self.inner.user_id.lock().clone()
    }

    /// Rooms joined successfully and not left since
    pub fn joined_rooms(&self) -> Vec<RoomId> {
        self.inner.joined_rooms.lock().iter().copied().collect()
    }

    /// The error that ended the last driver, if any
    pub fn last_error(&self) -> Option<SessionError> {
        self.inner.last_error.lock().clone()
    }

    async fn rejoin_tracked(&self) {
        let rooms = self.joined_rooms();
        for room in rooms {
            match self.room_request(EventType::JoinRoom, room, None).await {
                Ok(ack) if ack.success => {
                    tracing::debug!(room = %room, "Room re-joined after reconnect");
                    self.inner.emit(SessionEvent::Rejoined {
                        room,
                        active_users: ack.active_users.unwrap_or_default(),
                    });
                }
                Ok(_) => {
                    self.inner.joined_rooms.lock().remove(&room);
                }
                Err(e) => {
                    tracing::warn!(room = %room, error = %e, "Failed to re-join room");
                    self.inner.emit(SessionEvent::Error {
                        message: format!("re-join {room} failed: {e}"),
                    });
                }
            }
        }
    }
}

impl std::fmt::Debug for RealtimeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeSession")
            .field("state", &self.state())
            .field("user_id", &self.user_id())
            .field("joined_rooms", &self.joined_rooms())
            .field("leases", &self.lease_count())
            .finish()
    }
}

fn encode(payload: impl Serialize) -> Result<Value, SessionError> {
    serde_json::to_value(payload).map_err(|e| SessionError::Encode(e.to_string()))
}

fn soften(room: RoomId, event: EventType, result: Result<AckPayload, SessionError>) -> AckPayload {
    result.unwrap_or_else(|e| {
        tracing::warn!(room = %room, event = %event, error = %e, "Room request failed");
        AckPayload::failed(e.to_string())
    })
}

/// Removes a pending request however the caller stops waiting
struct PendingGuard<'a> {
    pending: &'a DashMap<u64, PendingReply>,
    id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.remove(&self.id);
    }
}

impl Inner {
    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.lifecycle.send(event);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.driver
            .lock()
            .as_ref()
            .is_some_and(|d| d.generation == generation)
    }

    /// Write state only while `generation` still owns the session
    fn set_state(&self, generation: u64, state: ConnectionState) -> bool {
        let slot = self.driver.lock();
        if slot.as_ref().is_some_and(|d| d.generation == generation) {
            self.state.send_replace(state);
            true
        } else {
            false
        }
    }

    fn fail_pending(&self, err: &SessionError) {
        let ids: Vec<u64> = self.pending.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            if let Some((_, reply)) = self.pending.remove(&id) {
                let _ = reply.send(Err(err.clone()));
            }
        }
    }

    /// End the driver for good
    fn terminate(&self, generation: u64, err: SessionError) {
        {
            let mut slot = self.driver.lock();
            if !slot.as_ref().is_some_and(|d| d.generation == generation) {
                return;
            }
            slot.take();
            *self.last_error.lock() = Some(err.clone());
            self.state.send_replace(ConnectionState::Disconnected);
        }

        self.joined_rooms.lock().clear();
        tracing::error!(error = %err, "Realtime session failed");
        self.emit(SessionEvent::ReconnectFailed {
            reason: err.to_string(),
        });
    }
}

/// An authenticated connection
struct LiveConnection {
    outbound: mpsc::Sender<String>,
    inbound: mpsc::Receiver<TransportEvent>,
    heartbeat_interval: Duration,
    ready: ReadyEvent,
}

/// Why a live connection stopped
enum ConnectionEnd {
    Cancelled,
    Retry(String),
    Terminal(SessionError),
}

async fn run_driver(inner: Arc<Inner>, target: Target, cancel: CancellationToken, generation: u64) {
    let policy = inner.options.policy;
    let mut failures: u32 = 0;
    let mut connected_before = false;

    loop {
        let attempt = tokio::select! {
            () = cancel.cancelled() => return,
            attempt = connect_once(&inner, &target) => attempt,
        };

        match attempt {
            Ok(live) => {
                failures = 0;
                let user_id = live.ready.user_id.clone();
                *inner.user_id.lock() = Some(user_id.clone());
                *inner.outbound.lock() = Some(live.outbound.clone());
                if !inner.set_state(generation, ConnectionState::Connected) {
                    inner.outbound.lock().take();
                    return;
                }

                tracing::info!(
                    user_id = %user_id,
                    session_id = %live.ready.session_id,
                    endpoint = %target.endpoint,
                    "Realtime session connected"
                );

                if connected_before {
                    inner.emit(SessionEvent::Reconnected { user_id });
                    let session = RealtimeSession {
                        inner: Arc::clone(&inner),
                    };
                    tokio::spawn(async move { session.rejoin_tracked().await });
                } else {
                    inner.emit(SessionEvent::Connected { user_id });
                }
                connected_before = true;

                let end = run_connection(&inner, live, &cancel).await;

                if inner.is_current(generation) {
                    inner.outbound.lock().take();
                }
                inner.fail_pending(&SessionError::ConnectionLost);

                match end {
                    ConnectionEnd::Cancelled => return,
                    ConnectionEnd::Terminal(err) => {
                        inner.terminate(generation, err);
                        return;
                    }
                    ConnectionEnd::Retry(reason) => {
                        tracing::warn!(reason = %reason, "Realtime connection lost");
                        inner.emit(SessionEvent::Disconnected { reason });
                    }
                }
            }
            Err(err) if err.is_terminal() => {
                inner.terminate(generation, err);
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, attempt = failures, "Connect attempt failed");
                inner.emit(SessionEvent::Error {
                    message: err.to_string(),
                });
            }
        }

        failures += 1;
        if !policy.allows(failures) {
            inner.terminate(generation, SessionError::ReconnectExhausted(policy.max_attempts));
            return;
        }

        let delay = policy.next_delay(failures);
        if !inner.set_state(generation, ConnectionState::Reconnecting) {
            return;
        }
        tracing::info!(
            attempt = failures,
            delay_ms = delay.as_millis() as u64,
            "Reconnecting realtime session"
        );
        inner.emit(SessionEvent::Reconnecting {
            attempt: failures,
            delay,
        });

        tokio::select! {
            () = cancel.cancelled() => return,
            () = tokio::time::sleep(delay) => {}
        }
    }
}

async fn connect_once(inner: &Inner, target: &Target) -> Result<LiveConnection, SessionError> {
    let channel = inner.connector.connect(&target.endpoint).await?;

    tokio::time::timeout(
        inner.options.handshake_timeout,
        handshake(channel, &target.credentials),
    )
    .await
    .map_err(|_| SessionError::HandshakeTimeout)?
}

/// Hello, Identify, then `ready` or `InvalidSession`
async fn handshake(channel: Channel, credentials: &Credentials) -> Result<LiveConnection, SessionError> {
    let Channel {
        outbound,
        mut inbound,
    } = channel;

    let hello = loop {
        let message = next_handshake_frame(&mut inbound).await?;
        if let Some(hello) = message.as_hello() {
            break hello;
        }
        tracing::debug!(%message, "Ignoring frame before Hello");
    };

    let identify = IdentifyPayload::new(credentials.token()).with_properties(IdentifyProperties::current());
    let frame = GatewayMessage::identify(&identify)
        .to_json()
        .map_err(|e| SessionError::Encode(e.to_string()))?;
    outbound
        .send(frame)
        .await
        .map_err(|_| SessionError::HandshakeFailed("connection closed during Identify".to_string()))?;

    let ready = loop {
        let message = next_handshake_frame(&mut inbound).await?;
        match message.op {
            OpCode::InvalidSession => return Err(SessionError::AuthRejected),
            OpCode::Dispatch if message.t.as_deref() == Some(EventType::Ready.as_str()) => {
                break message
                    .payload::<ReadyEvent>()
                    .ok_or_else(|| SessionError::HandshakeFailed("malformed ready".to_string()))?;
            }
            _ => tracing::debug!(%message, "Ignoring frame before ready"),
        }
    };

    Ok(LiveConnection {
        outbound,
        inbound,
        heartbeat_interval: Duration::from_millis(hello.heartbeat_interval.max(1)),
        ready,
    })
}

async fn next_handshake_frame(
    inbound: &mut mpsc::Receiver<TransportEvent>,
) -> Result<GatewayMessage, SessionError> {
    loop {
        match inbound.recv().await {
            Some(TransportEvent::Text(text)) => match GatewayMessage::from_json(&text) {
                Ok(message) => return Ok(message),
                Err(e) => tracing::debug!(error = %e, "Undecodable frame during handshake"),
            },
            Some(TransportEvent::Closed { code, reason }) => {
                return Err(if CloseCode::raw_should_reconnect(code) {
                    SessionError::HandshakeFailed(format!("closed during handshake: {reason}"))
                } else {
                    SessionError::AuthRejected
                });
            }
            None => {
                return Err(SessionError::HandshakeFailed(
                    "connection closed during handshake".to_string(),
                ));
            }
        }
    }
}

/// Pump one authenticated connection until it ends
async fn run_connection(
    inner: &Inner,
    mut live: LiveConnection,
    cancel: &CancellationToken,
) -> ConnectionEnd {
    let period = live.heartbeat_interval;
    let mut heartbeat = tokio::time::interval_at(Instant::now() + period, period);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut awaiting_heartbeat_ack = false;

    loop {
        tokio::select! {
            () = cancel.cancelled() => return ConnectionEnd::Cancelled,

            _ = heartbeat.tick() => {
                if awaiting_heartbeat_ack {
                    return ConnectionEnd::Retry("heartbeat not acknowledged".to_string());
                }
                if let Ok(frame) = GatewayMessage::heartbeat().to_json() {
                    if let Err(mpsc::error::TrySendError::Closed(_)) = live.outbound.try_send(frame) {
                        return ConnectionEnd::Retry("outbound channel closed".to_string());
                    }
                }
                awaiting_heartbeat_ack = true;
            }

            frame = live.inbound.recv() => match frame {
                Some(TransportEvent::Text(text)) => {
                    let Ok(message) = GatewayMessage::from_json(&text) else {
                        tracing::debug!("Dropping undecodable frame");
                        continue;
                    };
                    if message.op == OpCode::HeartbeatAck {
                        awaiting_heartbeat_ack = false;
                        continue;
                    }
                    if let Some(end) = handle_frame(inner, message) {
                        return end;
                    }
                }
                Some(TransportEvent::Closed { code, reason }) => {
                    if CloseCode::raw_should_reconnect(code) {
                        return ConnectionEnd::Retry(format!(
                            "closed ({}): {reason}",
                            code.map_or_else(|| "no code".to_string(), |c| c.to_string())
                        ));
                    }
                    return ConnectionEnd::Terminal(SessionError::AuthRejected);
                }
                None => return ConnectionEnd::Retry("transport closed".to_string()),
            },
        }
    }
}

fn handle_frame(inner: &Inner, message: GatewayMessage) -> Option<ConnectionEnd> {
    tracing::trace!(op = %message.op, "Received message");

    match message.op {
        OpCode::Dispatch => {
            let Some(name) = message.t.as_deref() else {
                tracing::debug!("Dispatch without event name");
                return None;
            };
            match InboundEvent::decode(name, message.d.clone()) {
                Ok(event) => {
                    let _ = inner.events.send(event);
                }
                Err(e) => tracing::debug!(error = %e, "Dropping event"),
            }
        }
        OpCode::Ack => match message.as_ack() {
            Some((id, ack)) => match inner.pending.remove(&id) {
                Some((_, reply)) => {
                    let _ = reply.send(Ok(ack));
                }
                None => tracing::debug!(id, "Ack for unknown request"),
            },
            None => tracing::debug!("Malformed ack"),
        },
        OpCode::Reconnect => {
            return Some(ConnectionEnd::Retry("server requested reconnect".to_string()));
        }
        OpCode::InvalidSession => {
            return Some(ConnectionEnd::Terminal(SessionError::AuthRejected));
        }
        OpCode::Hello | OpCode::HeartbeatAck => {}
        OpCode::Heartbeat | OpCode::Identify | OpCode::Emit | OpCode::Request => {
            tracing::debug!(op = %message.op, "Ignoring client op from server");
        }
    }
    None
}

//! In-process collaboration server
//!
//! Speaks the realtime protocol on `/collab` and serves the REST routes the
//! client calls. Every REST write is broadcast to the sockets joined to the
//! affected room.

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use collab_client::events::{
    InboundEvent, MembershipEvent, MessageDeletedEvent, NoteDeletedEvent, PresenceChangedEvent,
    ReactionEvent, ReadyEvent, SubtaskDeletedEvent, TypingEvent,
};
use collab_client::protocol::{
    AckPayload, CloseCode, GatewayMessage, HelloPayload, OpCode, PresenceUpdatePayload,
    RoomRequest, TypingPayload,
};
use collab_core::entities::{add_reaction, remove_reaction};
use collab_core::{Entity, EntityId, Note, RoomId, Subtask, TeamMessage, UserId};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::fixtures::user_for_token;

/// Heartbeat interval announced in Hello
const HEARTBEAT_INTERVAL_MS: u64 = 30_000;

enum Outbound {
    Frame(GatewayMessage),
    Close(u16),
}

struct Peer {
    user: UserId,
    tx: mpsc::UnboundedSender<Outbound>,
    rooms: HashSet<RoomId>,
}

#[derive(Default)]
struct Inner {
    peers: Mutex<HashMap<u64, Peer>>,
    next_peer: AtomicU64,
    next_entity: AtomicU64,
    identified: AtomicU32,
    denied_rooms: Mutex<HashSet<RoomId>>,
    emits: Mutex<Vec<String>>,
    notes: Mutex<Vec<Note>>,
    subtasks: Mutex<Vec<Subtask>>,
    messages: Mutex<Vec<TeamMessage>>,
}

/// Shared server state, cheap to clone
#[derive(Clone, Default)]
pub struct GatewayState {
    inner: Arc<Inner>,
}

impl GatewayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful Identify handshakes so far
    pub fn identified(&self) -> u32 {
        self.inner.identified.load(Ordering::SeqCst)
    }

    pub fn connection_count(&self) -> usize {
        self.inner.peers.lock().len()
    }

    /// Users with a socket joined to `room`, sorted
    pub fn room_members(&self, room: RoomId) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .inner
            .peers
            .lock()
            .values()
            .filter(|peer| peer.rooms.contains(&room))
            .map(|peer| peer.user.clone())
            .collect();
        users.sort();
        users.dedup();
        users
    }

    /// Emits received so far, as `"<event> <room>"`
    pub fn emits(&self) -> Vec<String> {
        self.inner.emits.lock().clone()
    }

    /// Reject future joins of `room`
    pub fn deny_join(&self, room: RoomId) {
        self.inner.denied_rooms.lock().insert(room);
    }

    /// Close every socket with `code`
    pub fn close_all(&self, code: u16) {
        for peer in self.inner.peers.lock().values() {
            let _ = peer.tx.send(Outbound::Close(code));
        }
    }

    /// Dispatch a server event to every socket joined to its room
    pub fn dispatch(&self, event: InboundEvent) {
        if let Some(room) = event.room() {
            self.broadcast(room, &event, None);
        }
    }

    pub fn insert_note(&self, note: Note) {
        self.inner.notes.lock().push(note);
    }

    pub fn insert_subtask(&self, subtask: Subtask) {
        self.inner.subtasks.lock().push(subtask);
    }

    pub fn insert_message(&self, message: TeamMessage) {
        self.inner.messages.lock().push(message);
    }

    fn next_entity_id(&self) -> EntityId {
        EntityId::new(1000 + self.inner.next_entity.fetch_add(1, Ordering::SeqCst))
    }

    fn send_to(&self, peer_id: u64, message: GatewayMessage) {
        if let Some(peer) = self.inner.peers.lock().get(&peer_id) {
            let _ = peer.tx.send(Outbound::Frame(message));
        }
    }

    fn broadcast(&self, room: RoomId, event: &InboundEvent, except: Option<u64>) {
        let (event_type, data) = event.clone().into_parts();
        let frame = GatewayMessage::dispatch(event_type.as_str(), data);

        for (id, peer) in self.inner.peers.lock().iter() {
            if Some(*id) != except && peer.rooms.contains(&room) {
                let _ = peer.tx.send(Outbound::Frame(frame.clone()));
            }
        }
    }

    fn register(&self, user: UserId, tx: mpsc::UnboundedSender<Outbound>) -> u64 {
        let id = self.inner.next_peer.fetch_add(1, Ordering::SeqCst);
        self.inner.peers.lock().insert(
            id,
            Peer {
                user,
                tx,
                rooms: HashSet::new(),
            },
        );
        self.inner.identified.fetch_add(1, Ordering::SeqCst);
        id
    }

    fn unregister(&self, peer_id: u64) {
        let Some(peer) = self.inner.peers.lock().remove(&peer_id) else {
            return;
        };
        for room in peer.rooms {
            self.announce_leave(room, &peer.user, peer_id);
        }
    }

    fn peer_user(&self, peer_id: u64) -> Option<UserId> {
        self.inner
            .peers
            .lock()
            .get(&peer_id)
            .map(|peer| peer.user.clone())
    }

    fn handle_frame(&self, peer_id: u64, frame: GatewayMessage) {
        match frame.op {
            OpCode::Heartbeat => self.send_to(peer_id, GatewayMessage::heartbeat_ack()),
            OpCode::Request => self.handle_request(peer_id, &frame),
            OpCode::Emit => self.handle_emit(peer_id, &frame),
            _ => tracing::debug!(op = %frame.op, "Ignoring frame"),
        }
    }

    fn handle_request(&self, peer_id: u64, frame: &GatewayMessage) {
        let Some(id) = frame.id else { return };
        let Some(user) = self.peer_user(peer_id) else {
            return;
        };
        let Some(RoomRequest { room }) = frame.payload() else {
            self.send_to(peer_id, GatewayMessage::ack(id, &AckPayload::failed("bad payload")));
            return;
        };

        match frame.t.as_deref() {
            Some("join_room") => {
                if self.inner.denied_rooms.lock().contains(&room) {
                    self.send_to(peer_id, GatewayMessage::ack(id, &AckPayload::failed("forbidden")));
                    return;
                }
                if let Some(peer) = self.inner.peers.lock().get_mut(&peer_id) {
                    peer.rooms.insert(room);
                }
                let active_users = self.room_members(room);
                self.send_to(
                    peer_id,
                    GatewayMessage::ack(id, &AckPayload::joined(active_users.clone())),
                );
                let joined = InboundEvent::UserJoined(MembershipEvent {
                    room,
                    user_id: user,
                    active_users,
                });
                self.broadcast(room, &joined, Some(peer_id));
            }
            Some("leave_room") => {
                if let Some(peer) = self.inner.peers.lock().get_mut(&peer_id) {
                    peer.rooms.remove(&room);
                }
                self.send_to(peer_id, GatewayMessage::ack(id, &AckPayload::ok()));
                self.announce_leave(room, &user, peer_id);
            }
            _ => self.send_to(
                peer_id,
                GatewayMessage::ack(id, &AckPayload::failed("unknown request")),
            ),
        }
    }

    fn handle_emit(&self, peer_id: u64, frame: &GatewayMessage) {
        let Some(user) = self.peer_user(peer_id) else {
            return;
        };
        let name = frame.t.as_deref().unwrap_or_default();

        let event = match name {
            "typing_start" | "typing_stop" => frame.payload::<TypingPayload>().map(|p| {
                InboundEvent::TypingIndicator(TypingEvent {
                    room: p.room,
                    user_id: user,
                    is_typing: p.is_typing,
                })
            }),
            "presence_update" => frame.payload::<PresenceUpdatePayload>().map(|p| {
                InboundEvent::PresenceChanged(PresenceChangedEvent {
                    room: p.room,
                    user_id: user,
                    status: p.status,
                })
            }),
            _ => None,
        };

        if let Some(event) = event {
            if let Some(room) = event.room() {
                self.inner.emits.lock().push(format!("{name} {room}"));
                self.broadcast(room, &event, Some(peer_id));
            }
        }
    }

    fn announce_leave(&self, room: RoomId, user: &UserId, peer_id: u64) {
        let left = InboundEvent::UserLeft(MembershipEvent {
            room,
            user_id: user.clone(),
            active_users: self.room_members(room),
        });
        self.broadcast(room, &left, Some(peer_id));
    }
}

/// Realtime endpoint plus the REST routes
pub fn create_app(state: GatewayState) -> Router {
    Router::new()
        .route("/collab", get(gateway_handler))
        .route("/tickets/:ticket_id/notes", get(list_notes).post(create_note))
        .route(
            "/tickets/:ticket_id/notes/:note_id",
            patch(update_note).delete(delete_note),
        )
        .route("/notes/:note_id/reactions", post(toggle_note_reaction))
        .route(
            "/tickets/:ticket_id/subtasks",
            get(list_subtasks).post(create_subtask),
        )
        .route(
            "/tickets/:ticket_id/subtasks/:subtask_id",
            patch(update_subtask).delete(delete_subtask),
        )
        .route(
            "/teams/:team_id/messages",
            get(list_messages).post(create_message),
        )
        .route("/teams/:team_id/messages/:message_id", delete(delete_message))
        .route("/messages/:message_id/reactions", post(toggle_message_reaction))
        .with_state(state)
}

// === Realtime ===

async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();

    let hello = GatewayMessage::hello(HelloPayload::with_interval(HEARTBEAT_INTERVAL_MS));
    if send_frame(&mut sink, &hello).await.is_err() {
        return;
    }

    let Some(user) = identify(&mut sink, &mut stream).await else {
        return;
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let peer_id = state.register(user.clone(), tx);
    let ready = InboundEvent::Ready(ReadyEvent {
        user_id: user.clone(),
        session_id: format!("session-{peer_id}"),
    });
    let (event_type, data) = ready.into_parts();
    state.send_to(peer_id, GatewayMessage::dispatch(event_type.as_str(), data));
    tracing::debug!(peer_id, user = %user, "Test gateway session ready");

    let writer = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            match outbound {
                Outbound::Frame(message) => {
                    if send_frame(&mut sink, &message).await.is_err() {
                        break;
                    }
                }
                Outbound::Close(code) => {
                    let _ = sink.send(close_message(code)).await;
                    break;
                }
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => match GatewayMessage::from_json(&text) {
                Ok(frame) => state.handle_frame(peer_id, frame),
                Err(e) => tracing::debug!(peer_id, error = %e, "Undecodable frame"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    state.unregister(peer_id);
    let _ = writer.await;
}

/// Wait for Identify; reject unknown tokens the way the server does
async fn identify(
    sink: &mut SplitSink<WebSocket, Message>,
    stream: &mut SplitStream<WebSocket>,
) -> Option<UserId> {
    while let Some(Ok(message)) = stream.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let identify = GatewayMessage::from_json(&text)
            .ok()
            .and_then(|frame| frame.as_identify());

        return match identify.as_ref().and_then(|i| user_for_token(&i.token)) {
            Some(user) => Some(user),
            None => {
                let _ = send_frame(sink, &GatewayMessage::invalid_session()).await;
                let _ = sink
                    .send(close_message(CloseCode::AuthenticationFailed.as_u16()))
                    .await;
                None
            }
        };
    }
    None
}

async fn send_frame(
    sink: &mut SplitSink<WebSocket, Message>,
    message: &GatewayMessage,
) -> Result<(), axum::Error> {
    let json = message.to_json().map_err(axum::Error::new)?;
    sink.send(Message::Text(json)).await
}

fn close_message(code: u16) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: CloseCode::from_u16(code)
            .map_or("closed", CloseCode::description)
            .into(),
    }))
}

// === REST ===

struct ApiError(StatusCode, &'static str);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": { "message": self.1 } }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn authorize(headers: &HeaderMap) -> ApiResult<UserId> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(user_for_token)
        .ok_or(ApiError(StatusCode::UNAUTHORIZED, "Invalid token"))
}

fn not_blank(value: &str, message: &'static str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError(StatusCode::UNPROCESSABLE_ENTITY, message));
    }
    Ok(())
}

/// Toggle `user`'s `emoji` on one entity; returns its room and whether it was added
fn toggle_reaction<E: Entity>(
    items: &mut [E],
    id: EntityId,
    emoji: &str,
    user: &UserId,
) -> Option<(RoomId, bool)> {
    let entity = items.iter_mut().find(|item| item.id() == id)?;
    let room = entity.room();
    let reactions = entity.reactions_mut()?;
    let added = if remove_reaction(reactions, emoji, user) {
        false
    } else {
        add_reaction(reactions, emoji, user)
    };
    Some((room, added))
}

fn reaction_event(
    room: RoomId,
    entity_id: EntityId,
    emoji: String,
    user_id: UserId,
    added: bool,
) -> InboundEvent {
    let event = ReactionEvent {
        room,
        entity_id,
        emoji,
        user_id,
    };
    if added {
        InboundEvent::ReactionAdded(event)
    } else {
        InboundEvent::ReactionRemoved(event)
    }
}

#[derive(Deserialize)]
struct NoteBody {
    body: String,
    #[serde(default)]
    internal: bool,
}

#[derive(Deserialize)]
struct NotePatchBody {
    body: Option<String>,
    internal: Option<bool>,
}

#[derive(Deserialize)]
struct SubtaskBody {
    title: String,
}

#[derive(Deserialize)]
struct SubtaskPatchBody {
    title: Option<String>,
    completed: Option<bool>,
    position: Option<u32>,
}

#[derive(Deserialize)]
struct MessageBody {
    content: String,
}

#[derive(Deserialize)]
struct ReactionBody {
    emoji: String,
}

async fn list_notes(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(ticket_id): Path<u64>,
) -> ApiResult<Json<Vec<Note>>> {
    authorize(&headers)?;
    let ticket_id = EntityId::new(ticket_id);
    let notes = state
        .inner
        .notes
        .lock()
        .iter()
        .filter(|note| note.ticket_id == ticket_id)
        .cloned()
        .collect();
    Ok(Json(notes))
}

async fn create_note(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(ticket_id): Path<u64>,
    Json(body): Json<NoteBody>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let user = authorize(&headers)?;
    not_blank(&body.body, "Note body is required")?;

    let mut note = Note::new(
        state.next_entity_id(),
        EntityId::new(ticket_id),
        user,
        body.body,
    );
    note.internal = body.internal;
    state.insert_note(note.clone());
    state.dispatch(InboundEvent::NoteCreated(note.clone()));
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((ticket_id, note_id)): Path<(u64, u64)>,
    Json(patch): Json<NotePatchBody>,
) -> ApiResult<Json<Note>> {
    authorize(&headers)?;
    let note = {
        let mut notes = state.inner.notes.lock();
        let note = notes
            .iter_mut()
            .find(|n| n.id == EntityId::new(note_id) && n.ticket_id == EntityId::new(ticket_id))
            .ok_or(ApiError(StatusCode::NOT_FOUND, "Note not found"))?;
        if let Some(body) = patch.body {
            not_blank(&body, "Note body is required")?;
            note.body = body;
        }
        if let Some(internal) = patch.internal {
            note.internal = internal;
        }
        note.updated_at = Some(Utc::now());
        note.clone()
    };
    state.dispatch(InboundEvent::NoteUpdated(note.clone()));
    Ok(Json(note))
}

async fn delete_note(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((ticket_id, note_id)): Path<(u64, u64)>,
) -> ApiResult<StatusCode> {
    authorize(&headers)?;
    let (ticket_id, note_id) = (EntityId::new(ticket_id), EntityId::new(note_id));
    {
        let mut notes = state.inner.notes.lock();
        let before = notes.len();
        notes.retain(|n| !(n.id == note_id && n.ticket_id == ticket_id));
        if notes.len() == before {
            return Err(ApiError(StatusCode::NOT_FOUND, "Note not found"));
        }
    }
    state.dispatch(InboundEvent::NoteDeleted(NoteDeletedEvent { ticket_id, note_id }));
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_note_reaction(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(note_id): Path<u64>,
    Json(body): Json<ReactionBody>,
) -> ApiResult<StatusCode> {
    let user = authorize(&headers)?;
    not_blank(&body.emoji, "Emoji is required")?;
    let note_id = EntityId::new(note_id);

    let toggled = toggle_reaction(&mut state.inner.notes.lock(), note_id, &body.emoji, &user);
    let (room, added) = toggled.ok_or(ApiError(StatusCode::NOT_FOUND, "Note not found"))?;
    state.dispatch(reaction_event(room, note_id, body.emoji, user, added));
    Ok(StatusCode::NO_CONTENT)
}

async fn list_subtasks(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(ticket_id): Path<u64>,
) -> ApiResult<Json<Vec<Subtask>>> {
    authorize(&headers)?;
    let ticket_id = EntityId::new(ticket_id);
    let mut subtasks: Vec<Subtask> = state
        .inner
        .subtasks
        .lock()
        .iter()
        .filter(|subtask| subtask.ticket_id == ticket_id)
        .cloned()
        .collect();
    subtasks.sort_by_key(|subtask| subtask.position);
    Ok(Json(subtasks))
}

async fn create_subtask(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(ticket_id): Path<u64>,
    Json(body): Json<SubtaskBody>,
) -> ApiResult<(StatusCode, Json<Subtask>)> {
    authorize(&headers)?;
    not_blank(&body.title, "Subtask title is required")?;

    let ticket_id = EntityId::new(ticket_id);
    let subtask = {
        let mut subtasks = state.inner.subtasks.lock();
        let position = subtasks.iter().filter(|s| s.ticket_id == ticket_id).count() as u32;
        let subtask = Subtask::new(state.next_entity_id(), ticket_id, body.title, position);
        subtasks.push(subtask.clone());
        subtask
    };
    state.dispatch(InboundEvent::ChecklistUpdated(subtask.clone()));
    Ok((StatusCode::CREATED, Json(subtask)))
}

async fn update_subtask(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((ticket_id, subtask_id)): Path<(u64, u64)>,
    Json(patch): Json<SubtaskPatchBody>,
) -> ApiResult<Json<Subtask>> {
    authorize(&headers)?;
    let subtask = {
        let mut subtasks = state.inner.subtasks.lock();
        let subtask = subtasks
            .iter_mut()
            .find(|s| s.id == EntityId::new(subtask_id) && s.ticket_id == EntityId::new(ticket_id))
            .ok_or(ApiError(StatusCode::NOT_FOUND, "Subtask not found"))?;
        if let Some(title) = patch.title {
            not_blank(&title, "Subtask title is required")?;
            subtask.title = title;
        }
        if let Some(completed) = patch.completed {
            subtask.completed = completed;
        }
        if let Some(position) = patch.position {
            subtask.position = position;
        }
        subtask.clone()
    };
    state.dispatch(InboundEvent::ChecklistUpdated(subtask.clone()));
    Ok(Json(subtask))
}

async fn delete_subtask(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((ticket_id, subtask_id)): Path<(u64, u64)>,
) -> ApiResult<StatusCode> {
    authorize(&headers)?;
    let (ticket_id, subtask_id) = (EntityId::new(ticket_id), EntityId::new(subtask_id));
    {
        let mut subtasks = state.inner.subtasks.lock();
        let before = subtasks.len();
        subtasks.retain(|s| !(s.id == subtask_id && s.ticket_id == ticket_id));
        if subtasks.len() == before {
            return Err(ApiError(StatusCode::NOT_FOUND, "Subtask not found"));
        }
    }
    state.dispatch(InboundEvent::SubtaskDeleted(SubtaskDeletedEvent {
        ticket_id,
        subtask_id,
    }));
    Ok(StatusCode::NO_CONTENT)
}

async fn list_messages(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(team_id): Path<u64>,
) -> ApiResult<Json<Vec<TeamMessage>>> {
    authorize(&headers)?;
    let team_id = EntityId::new(team_id);
    let messages = state
        .inner
        .messages
        .lock()
        .iter()
        .filter(|message| message.team_id == team_id)
        .cloned()
        .collect();
    Ok(Json(messages))
}

async fn create_message(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(team_id): Path<u64>,
    Json(body): Json<MessageBody>,
) -> ApiResult<(StatusCode, Json<TeamMessage>)> {
    let user = authorize(&headers)?;
    not_blank(&body.content, "Message content is required")?;

    let message = TeamMessage::new(
        state.next_entity_id(),
        EntityId::new(team_id),
        user,
        body.content,
    );
    state.insert_message(message.clone());
    state.dispatch(InboundEvent::MessageCreated(message.clone()));
    Ok((StatusCode::CREATED, Json(message)))
}

async fn delete_message(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((team_id, message_id)): Path<(u64, u64)>,
) -> ApiResult<StatusCode> {
    authorize(&headers)?;
    let (team_id, message_id) = (EntityId::new(team_id), EntityId::new(message_id));
    {
        let mut messages = state.inner.messages.lock();
        let before = messages.len();
        messages.retain(|m| !(m.id == message_id && m.team_id == team_id));
        if messages.len() == before {
            return Err(ApiError(StatusCode::NOT_FOUND, "Message not found"));
        }
    }
    state.dispatch(InboundEvent::MessageDeleted(MessageDeletedEvent {
        team_id,
        message_id,
    }));
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_message_reaction(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(message_id): Path<u64>,
    Json(body): Json<ReactionBody>,
) -> ApiResult<StatusCode> {
    let user = authorize(&headers)?;
    not_blank(&body.emoji, "Emoji is required")?;
    let message_id = EntityId::new(message_id);

    let toggled = toggle_reaction(&mut state.inner.messages.lock(), message_id, &body.emoji, &user);
    let (room, added) = toggled.ok_or(ApiError(StatusCode::NOT_FOUND, "Message not found"))?;
    state.dispatch(reaction_event(room, message_id, body.emoji, user, added));
    Ok(StatusCode::NO_CONTENT)
}

//! Shared helpers for unit tests

use async_trait::async_trait;
use collab_common::Credentials;
use collab_core::{
    DomainError, Entity, EntityId, EntityRepository, RepoResult, RoomId, SharedLedger, UserId,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::protocol::AckPayload;
use crate::reconciler::RoomContext;
use crate::router::EventRouter;
use crate::session::{ReconnectPolicy, RealtimeSession, SessionOptions};
use crate::transport::{MemoryConnector, MemoryPeer};

pub(crate) const TEST_ENDPOINT: &str = "memory://collab";

pub(crate) fn test_options() -> SessionOptions {
    SessionOptions {
        policy: ReconnectPolicy::new(2, Duration::from_millis(1000), Duration::from_millis(5000)),
        request_timeout: Duration::from_secs(10),
        handshake_timeout: Duration::from_secs(10),
    }
}

pub(crate) fn test_session(connector: &MemoryConnector) -> RealtimeSession {
    let session = RealtimeSession::new(Arc::new(connector.clone()), test_options());
    session.set_target(
        TEST_ENDPOINT,
        Credentials::new("test-token").expect("non-empty token"),
    );
    session
}

/// A session connected as `user` plus the server end of its connection
pub(crate) async fn connected_session(user: &str) -> (RealtimeSession, MemoryConnector, MemoryPeer) {
    let connector = MemoryConnector::new();
    let session = test_session(&connector);

    let server = connector.clone();
    let user = user.to_string();
    let accept = tokio::spawn(async move {
        let mut peer = server.accept().await.expect("client connects");
        peer.handshake(&user).await.expect("client identifies");
        peer
    });

    session.connect().await.expect("session connects");
    let peer = accept.await.expect("accept task");
    (session, connector, peer)
}

/// Connected session, running router, and the server end of the connection
pub(crate) struct RoomFixture {
    pub ctx: RoomContext,
    pub connector: MemoryConnector,
    pub peer: MemoryPeer,
}

impl RoomFixture {
    /// Acknowledge the next join request with `active` as the member list
    pub async fn ack_join(&mut self, active: &[&str]) {
        let (id, _) = self
            .peer
            .expect_request("join_room")
            .await
            .expect("join request");
        let users = active.iter().map(|user| UserId::from(*user)).collect();
        self.peer.ack(id, &AckPayload::joined(users)).await;
    }
}

pub(crate) async fn room_fixture(user: &str) -> RoomFixture {
    let (session, connector, peer) = connected_session(user).await;
    let router = Arc::new(EventRouter::new(SharedLedger::new()));
    Arc::clone(&router).start(&session);

    RoomFixture {
        ctx: RoomContext::new(session, router),
        connector,
        peer,
    }
}

/// Repository answering from memory and recording every write
pub(crate) struct FakeRepository<E: Entity> {
    items: Mutex<Vec<E>>,
    reply: Mutex<Option<E>>,
    fail_list: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl<E: Entity> FakeRepository<E> {
    pub fn with_items(items: Vec<E>) -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(items),
            reply: Mutex::new(None),
            fail_list: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::with_items(Vec::new())
    }

    pub fn set_items(&self, items: Vec<E>) {
        *self.items.lock() = items;
    }

    /// Entity returned by the next create or update
    pub fn reply_with(&self, entity: E) {
        *self.reply.lock() = Some(entity);
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Writes received so far, as `"<op> <id> <json>"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn take_reply(&self) -> RepoResult<E> {
        self.reply
            .lock()
            .take()
            .ok_or_else(|| DomainError::InternalError("no reply queued".to_string()))
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for FakeRepository<E> {
    async fn list(&self, _room: RoomId) -> RepoResult<Vec<E>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(DomainError::TransportError("connection refused".to_string()));
        }
        Ok(self.items.lock().clone())
    }

    async fn create(&self, _room: RoomId, draft: &E::Draft) -> RepoResult<E> {
        self.record(format!("create {}", json(draft)));
        self.take_reply()
    }

    async fn update(&self, _room: RoomId, id: EntityId, patch: &E::Patch) -> RepoResult<E> {
        self.record(format!("update {id} {}", json(patch)));
        self.take_reply()
    }

    async fn delete(&self, _room: RoomId, id: EntityId) -> RepoResult<()> {
        self.record(format!("delete {id}"));
        Ok(())
    }

    async fn toggle_reaction(&self, _room: RoomId, id: EntityId, emoji: &str) -> RepoResult<()> {
        self.record(format!("react {id} {emoji}"));
        Ok(())
    }
}

fn json(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

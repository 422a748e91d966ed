//! Client facade
//!
//! Wires one session, one router, one ledger, and one REST client together
//! so rooms can be mounted with a single call.

use collab_common::{ClientConfig, CollabError, ConfigError, Credentials};
use collab_core::{EntityId, Note, SharedLedger, Subtask, TeamMessage};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::reconciler::{RoomContext, TeamRoom, TicketCollaboration};
use crate::rest::RestClient;
use crate::router::EventRouter;
use crate::session::{RealtimeSession, SessionLease, SessionOptions};
use crate::sweeper::PresenceSweeper;
use crate::transport::{Connector, WsConnector};

/// Everything one process needs to collaborate in realtime
pub struct CollabClient {
    config: ClientConfig,
    session: RealtimeSession,
    router: Arc<EventRouter>,
    rest: RestClient,
}

impl CollabClient {
    /// Client over WebSockets
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self, CollabError> {
        Self::with_connector(config, credentials, Arc::new(WsConnector::new()))
    }

    /// Client over a custom transport
    pub fn with_connector(
        config: ClientConfig,
        credentials: Credentials,
        connector: Arc<dyn Connector>,
    ) -> Result<Self, CollabError> {
        let session = RealtimeSession::new(connector, SessionOptions::from_config(&config));
        session.set_target(config.endpoints.gateway_endpoint(), credentials.clone());

        let rest = RestClient::from_config(&config, credentials)?;
        let router = Arc::new(EventRouter::new(SharedLedger::new()));

        Ok(Self {
            config,
            session,
            router,
            rest,
        })
    }

    /// Client configured from the environment; `COLLAB_TOKEN` is required
    pub fn from_env() -> Result<Self, CollabError> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Client using the token carried in `config`
    pub fn from_config(config: ClientConfig) -> Result<Self, CollabError> {
        let credentials = config
            .endpoints
            .token
            .as_deref()
            .and_then(Credentials::new)
            .ok_or(ConfigError::MissingVar("COLLAB_TOKEN"))?;
        Self::new(config, credentials)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &RealtimeSession {
        &self.session
    }

    pub fn router(&self) -> &Arc<EventRouter> {
        &self.router
    }

    pub fn ledger(&self) -> &SharedLedger {
        self.router.ledger()
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Context handed to every mounted room
    pub fn context(&self) -> RoomContext {
        RoomContext::new(self.session.clone(), Arc::clone(&self.router))
            .with_typing_idle(self.config.presence.typing_idle())
    }

    /// Connect and start background work
    ///
    /// The connection stays up while any returned handle is alive.
    pub async fn start(&self) -> Result<ClientHandle, CollabError> {
        Arc::clone(&self.router).start(&self.session);
        let lease = self.session.acquire().await?;

        let sweeper = CancellationToken::new();
        PresenceSweeper::from_config(self.ledger().clone(), &self.config.presence)
            .spawn(sweeper.clone());

        tracing::info!(
            endpoint = %self.config.endpoints.gateway_endpoint(),
            "Collaboration client started"
        );
        Ok(ClientHandle {
            _lease: lease,
            sweeper,
        })
    }

    pub fn mount_ticket(&self, ticket_id: EntityId) -> TicketCollaboration {
        TicketCollaboration::mount(
            &self.context(),
            ticket_id,
            Arc::new(self.rest.repository::<Note>()),
            Arc::new(self.rest.repository::<Subtask>()),
        )
    }

    pub fn mount_team(&self, team_id: EntityId) -> TeamRoom {
        TeamRoom::mount(
            &self.context(),
            team_id,
            Arc::new(self.rest.repository::<TeamMessage>()),
        )
    }
}

impl std::fmt::Debug for CollabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollabClient")
            .field("session", &self.session)
            .field("router", &self.router)
            .field("rest", &self.rest)
            .finish()
    }
}

/// Keeps the connection and the presence sweeper alive
#[must_use]
#[derive(Debug)]
pub struct ClientHandle {
    _lease: SessionLease,
    sweeper: CancellationToken,
}

impl Drop for ClientHandle {
    fn drop(&mut self) {
        self.sweeper.cancel();
    }
}

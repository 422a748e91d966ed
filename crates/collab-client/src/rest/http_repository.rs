//! HTTP entity repository
//!
//! REST access to notes, subtasks, and messages. Routes are scoped by room:
//! `/tickets/{id}/notes`, `/teams/{id}/messages`, and so on. Reactions are
//! toggled with `POST /{collection}/{entity_id}/reactions`.

use async_trait::async_trait;
use collab_common::{ClientConfig, Credentials};
use collab_core::{DomainError, Entity, EntityId, EntityRepository, RepoResult, RoomId};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use std::marker::PhantomData;
use std::time::Duration;

/// Shared HTTP client for every repository of one API
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl RestClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> RepoResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::InternalError(format!("HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url, credentials))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn from_config(config: &ClientConfig, credentials: Credentials) -> RepoResult<Self> {
        Self::new(&config.endpoints.api_url, credentials, config.timeouts.request())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Repository for one entity kind
    pub fn repository<E: Entity>(&self) -> HttpEntityRepository<E> {
        HttpEntityRepository {
            rest: self.clone(),
            _entity: PhantomData,
        }
    }

    async fn send(&self, request: RequestBuilder) -> RepoResult<Response> {
        request
            .bearer_auth(self.credentials.token())
            .send()
            .await
            .map_err(|e| DomainError::TransportError(e.to_string()))
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// `EntityRepository` over the REST API
pub struct HttpEntityRepository<E> {
    rest: RestClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> HttpEntityRepository<E> {
    fn collection_url(&self, room: RoomId) -> String {
        format!(
            "{}/{}s/{}/{}",
            self.rest.base_url,
            room.kind(),
            room.entity_id(),
            E::COLLECTION
        )
    }

    fn entity_url(&self, room: RoomId, id: EntityId) -> String {
        format!("{}/{id}", self.collection_url(room))
    }

    fn reactions_url(&self, id: EntityId) -> String {
        format!("{}/{}/{id}/reactions", self.rest.base_url, E::COLLECTION)
    }

    /// Turn a non-success response into the matching domain error
    async fn check(response: Response, target: Target) -> RepoResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| status.to_string());
        tracing::debug!(status = status.as_u16(), message = %message, "REST call failed");
        Err(status_error(status, target, message))
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> RepoResult<T> {
        response
            .json()
            .await
            .map_err(|e| DomainError::DecodeError(e.to_string()))
    }
}

impl<E> Clone for HttpEntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            rest: self.rest.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> std::fmt::Debug for HttpEntityRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEntityRepository")
            .field("kind", &E::KIND)
            .field("base_url", &self.rest.base_url)
            .finish()
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for HttpEntityRepository<E> {
    async fn list(&self, room: RoomId) -> RepoResult<Vec<E>> {
        let url = self.collection_url(room);
        tracing::debug!(room = %room, kind = E::KIND, "Loading entities");

        let response = self.rest.send(self.rest.client.get(&url)).await?;
        let response = Self::check(response, Target::Room(room)).await?;
        Self::decode(response).await
    }

    async fn create(&self, room: RoomId, draft: &E::Draft) -> RepoResult<E> {
        let url = self.collection_url(room);
        let response = self.rest.send(self.rest.client.post(&url).json(draft)).await?;
        let response = Self::check(response, Target::Room(room)).await?;
        Self::decode(response).await
    }

    async fn update(&self, room: RoomId, id: EntityId, patch: &E::Patch) -> RepoResult<E> {
        let url = self.entity_url(room, id);
        let response = self.rest.send(self.rest.client.patch(&url).json(patch)).await?;
        let response = Self::check(response, Target::Entity(E::KIND, id)).await?;
        Self::decode(response).await
    }

    async fn delete(&self, room: RoomId, id: EntityId) -> RepoResult<()> {
        let url = self.entity_url(room, id);
        let response = self.rest.send(self.rest.client.delete(&url)).await?;
        Self::check(response, Target::Entity(E::KIND, id)).await?;
        Ok(())
    }

    async fn toggle_reaction(&self, _room: RoomId, id: EntityId, emoji: &str) -> RepoResult<()> {
        let url = self.reactions_url(id);
        let body = json!({ "emoji": emoji });
        let response = self.rest.send(self.rest.client.post(&url).json(&body)).await?;
        Self::check(response, Target::Entity(E::KIND, id)).await?;
        Ok(())
    }
}

/// What a failed call was addressing
#[derive(Debug, Clone, Copy)]
enum Target {
    Room(RoomId),
    Entity(&'static str, EntityId),
}

fn status_error(status: StatusCode, target: Target, message: String) -> DomainError {
    match status {
        StatusCode::NOT_FOUND => match target {
            Target::Entity(kind, id) => DomainError::NotFound { kind, id },
            Target::Room(room) => DomainError::NotFound {
                kind: room.kind(),
                id: room.entity_id(),
            },
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            DomainError::ValidationError(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DomainError::Unauthorized(message),
        _ => DomainError::TransportError(format!("HTTP {}: {message}", status.as_u16())),
    }
}

/// Pull a message out of `{"error": {"message"}}` or `{"message"}` bodies
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

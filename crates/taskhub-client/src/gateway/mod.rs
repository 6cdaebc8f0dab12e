//! Resource gateways: domain operations in, normalized results out.
//!
//! Every gateway goes through [`ApiClient::call`], which
//! - rewrites outbound task statuses into the configured [`StatusDialect`],
//! - reads the `{success, message, data}` envelope (or a bare payload),
//! - turns any failure into one [`ApiError`] whose message comes from the
//!   backend when it sent one, or from the operation's fallback text.
//!
//! Gateways never cache.

mod activity;
mod projects;
mod tasks;

pub use activity::ActivityGateway;
pub use projects::ProjectsGateway;
pub use tasks::{AssignTasks, TasksGateway};

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use taskhub_core::{ListDescriptor, ListPayload, Page, RawEnvelope, Resource, StatusDialect, extract_message};
use tracing::debug;

use crate::errors::{ApiError, ApiErrorKind};
use crate::transport::{ApiRequest, Transport};

// ─────────────────────────────────────────────────────────────────────────────
// Gateway traits
// ─────────────────────────────────────────────────────────────────────────────

/// Anything that can produce a page of entities for a descriptor.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    /// Entity type.
    type Item: Resource;

    /// Fetch one list for `descriptor`.
    async fn list(&self, descriptor: &ListDescriptor) -> Result<Page<Self::Item>, ApiError>;
}

/// Identifier type of a list source's entities.
pub type IdOf<G> = <<G as ListSource>::Item as Resource>::Id;

/// Full CRUD over one resource.
#[async_trait]
pub trait ResourceGateway: ListSource {
    /// Creation form.
    type Draft: Send + Sync;
    /// Partial update form.
    type Patch: Send + Sync;

    /// Fetch one entity.
    async fn get(&self, id: &IdOf<Self>) -> Result<Self::Item, ApiError>;

    /// Create an entity; returns the server's canonical copy.
    async fn create(&self, draft: &Self::Draft) -> Result<Self::Item, ApiError>;

    /// Update an entity; returns the server's canonical copy.
    async fn update(&self, id: &IdOf<Self>, patch: &Self::Patch) -> Result<Self::Item, ApiError>;

    /// Delete an entity; returns the deleted entity when the backend echoes it.
    async fn remove(&self, id: &IdOf<Self>) -> Result<Option<Self::Item>, ApiError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// ApiClient
// ─────────────────────────────────────────────────────────────────────────────

/// Shared plumbing for all gateways.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    dialect: StatusDialect,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Client over `transport`, encoding statuses in `dialect`.
    pub fn new(transport: Arc<dyn Transport>, dialect: StatusDialect) -> Self {
        Self { transport, dialect }
    }

    /// Outbound status dialect.
    pub fn dialect(&self) -> StatusDialect {
        self.dialect
    }

    /// Projects gateway.
    pub fn projects(&self) -> ProjectsGateway {
        ProjectsGateway::new(self.clone())
    }

    /// Tasks gateway.
    pub fn tasks(&self) -> TasksGateway {
        TasksGateway::new(self.clone())
    }

    /// Activity gateway.
    pub fn activity(&self) -> ActivityGateway {
        ActivityGateway::new(self.clone())
    }

    /// Send `request` and return the payload of a successful response.
    ///
    /// The payload is the envelope's `data` when the body is an envelope,
    /// otherwise the whole body. `None` means the backend sent nothing.
    pub async fn call(&self, mut request: ApiRequest, fallback: &str) -> Result<Option<Value>, ApiError> {
        if let Some(body) = request.body.as_mut() {
            self.dialect.rewrite_body(body);
        }
        let response = self.transport.send(request).await?;
        let message = || extract_message(&response.body).unwrap_or_else(|| fallback.to_string());

        match response.status {
            404 => return Err(ApiError::not_found(message(), Some(404))),
            401 => {
                return Err(ApiError::new(
                    ApiErrorKind::Unauthorized,
                    message(),
                    Some(401),
                ));
            }
            s if !response.is_success() => return Err(ApiError::rejected(message(), s)),
            _ => {}
        }

        if is_envelope(&response.body) {
            let envelope = RawEnvelope::from_value(&response.body).unwrap_or_default();
            if !envelope.is_success() {
                return Err(ApiError::rejected(message(), response.status));
            }
            return Ok(envelope.data.filter(|d| !d.is_null()));
        }

        Ok(Some(response.body).filter(|b| !b.is_null()))
    }

    /// [`call`](Self::call) and decode a list payload.
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        fallback: &str,
    ) -> Result<Page<T>, ApiError> {
        let data = self.call(request, fallback).await?;
        ListPayload::decode(data).map_err(|e| {
            debug!(error = %e, "list payload did not decode");
            ApiError::new(ApiErrorKind::Malformed, fallback, None)
        })
    }

    /// [`call`](Self::call) and decode a single entity.
    ///
    /// The entity may be the payload itself or sit under `key`
    /// (`{"task": {...}}`).
    pub async fn fetch_entity<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        key: &str,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let data = self.call(request, fallback).await?;
        let data = data.ok_or_else(|| ApiError::new(ApiErrorKind::Malformed, fallback, None))?;
        decode_entity(data, key).ok_or_else(|| ApiError::new(ApiErrorKind::Malformed, fallback, None))
    }

    /// [`fetch_entity`](Self::fetch_entity) for a lookup by id.
    ///
    /// A 404 or a `success: false` answer both mean the entity is missing:
    /// the error is `NotFound`, worded by the backend or by `missing`.
    pub async fn fetch_existing<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        key: &str,
        fallback: &str,
        missing: &str,
    ) -> Result<T, ApiError> {
        match self.fetch_entity(request, key, fallback).await {
            Err(err) if err.is_not_found() || is_refusal(&err) => {
                let message = if err.message == fallback {
                    missing.to_string()
                } else {
                    err.message
                };
                Err(ApiError::not_found(message, err.status))
            }
            other => other,
        }
    }

    /// [`call`](Self::call) and decode an entity if the backend sent one.
    pub async fn fetch_optional<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        key: &str,
        fallback: &str,
    ) -> Result<Option<T>, ApiError> {
        let data = self.call(request, fallback).await?;
        Ok(data.and_then(|d| decode_entity(d, key)))
    }
}

/// A 2xx response whose envelope said `success: false`.
fn is_refusal(err: &ApiError) -> bool {
    err.kind == ApiErrorKind::Rejected && err.status.is_some_and(|s| (200..300).contains(&s))
}

fn is_envelope(body: &Value) -> bool {
    body.as_object()
        .is_some_and(|obj| obj.contains_key("success") || obj.contains_key("data"))
}

fn decode_entity<T: DeserializeOwned>(data: Value, key: &str) -> Option<T> {
    if let Some(inner) = data.get(key).filter(|v| v.is_object()) {
        if let Ok(entity) = serde_json::from_value(inner.clone()) {
            return Some(entity);
        }
    }
    serde_json::from_value(data).ok()
}

/// Serialize a request form.
pub(crate) fn to_body<T: Serialize>(form: &T) -> Result<Value, ApiError> {
    serde_json::to_value(form)
        .map_err(|e| ApiError::new(ApiErrorKind::Validation, format!("Invalid request: {e}"), None))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

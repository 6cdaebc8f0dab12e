//! Single-entity view: one task or project addressed by an optional id.

use std::sync::Arc;

use parking_lot::Mutex;
use taskhub_client::{ApiError, AssignTasks, IdOf, ResourceGateway};
use taskhub_core::{Resource, Task, TaskPatch, TaskPriority, TaskStatus, UserId};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Observable state of a [`ResourceHandle`].
#[derive(Debug, Clone)]
pub struct EntityState<T> {
    /// The entity, once fetched.
    pub entity: Option<T>,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Message of the last failure.
    pub error: Option<String>,
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            entity: None,
            loading: false,
            error: None,
        }
    }
}

struct HandleState<G: ResourceGateway> {
    id: Option<IdOf<G>>,
    view: EntityState<G::Item>,
    generation: u64,
}

struct HandleInner<G: ResourceGateway> {
    gateway: G,
    state: Mutex<HandleState<G>>,
    tx: watch::Sender<EntityState<G::Item>>,
}

/// Fetches and mutates one entity. Cloning shares the state.
pub struct ResourceHandle<G: ResourceGateway> {
    inner: Arc<HandleInner<G>>,
}

impl<G: ResourceGateway> Clone for ResourceHandle<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: ResourceGateway> std::fmt::Debug for ResourceHandle<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("ResourceHandle")
            .field("kind", &Self::kind())
            .field("id", &state.id.as_ref().map(ToString::to_string))
            .field("loaded", &state.view.entity.is_some())
            .finish_non_exhaustive()
    }
}

impl<G: ResourceGateway> ResourceHandle<G> {
    /// Handle for `id`. Nothing is fetched until [`fetch`](Self::fetch).
    pub fn new(gateway: G, id: Option<IdOf<G>>) -> Self {
        let (tx, _) = watch::channel(EntityState::default());
        Self {
            inner: Arc::new(HandleInner {
                gateway,
                state: Mutex::new(HandleState {
                    id,
                    view: EntityState::default(),
                    generation: 0,
                }),
                tx,
            }),
        }
    }

    /// Currently addressed id.
    pub fn id(&self) -> Option<IdOf<G>> {
        self.inner.state.lock().id.clone()
    }

    /// Current state.
    pub fn state(&self) -> EntityState<G::Item> {
        self.inner.state.lock().view.clone()
    }

    /// The entity, if loaded.
    pub fn entity(&self) -> Option<G::Item> {
        self.inner.state.lock().view.entity.clone()
    }

    /// Receiver that sees every published state change.
    pub fn subscribe(&self) -> watch::Receiver<EntityState<G::Item>> {
        self.inner.tx.subscribe()
    }

    /// Address a different entity and fetch it. The same id is not refetched.
    pub async fn set_id(&self, id: Option<IdOf<G>>) -> Result<Option<G::Item>, ApiError> {
        {
            let mut state = self.inner.state.lock();
            if state.id == id && (state.view.entity.is_some() || state.view.loading) {
                return Ok(state.view.entity.clone());
            }
            state.id = id;
            state.view.entity = None;
        }
        self.fetch().await
    }

    /// Fetch the addressed entity.
    ///
    /// Without an id the entity is cleared and nothing is fetched. A failed
    /// fetch also clears the entity. A response that arrives after the id
    /// changed is returned but not stored.
    #[tracing::instrument(skip_all, fields(kind = Self::kind()))]
    pub async fn fetch(&self) -> Result<Option<G::Item>, ApiError> {
        let (generation, id) = {
            let mut state = self.inner.state.lock();
            state.generation += 1;
            let Some(id) = state.id.clone() else {
                state.view = EntityState::default();
                self.publish(&state);
                return Ok(None);
            };
            state.view.loading = true;
            state.view.error = None;
            self.publish(&state);
            (state.generation, id)
        };

        let result = self.inner.gateway.get(&id).await;

        let mut state = self.inner.state.lock();
        if state.generation != generation {
            debug!(%id, "dropping stale entity response");
            return result.map(Some);
        }
        state.view.loading = false;
        match result {
            Ok(entity) => {
                state.view.entity = Some(entity.clone());
                self.publish(&state);
                Ok(Some(entity))
            }
            Err(err) => {
                warn!(%id, error = %err, "entity fetch failed");
                state.view.entity = None;
                state.view.error = Some(err.message.clone());
                self.publish(&state);
                Err(err)
            }
        }
    }

    /// Update the entity and store the server's copy.
    pub async fn edit(&self, patch: &G::Patch) -> Result<G::Item, ApiError> {
        let id = self.require_id()?;
        let result = self.inner.gateway.update(&id, patch).await;
        self.settle(result, |entity| Some(entity.clone()))
    }

    /// Delete the entity and clear it locally.
    pub async fn remove(&self) -> Result<(), ApiError> {
        let id = self.require_id()?;
        let result = self.inner.gateway.remove(&id).await;
        self.settle(result.map(|_| ()), |()| None)
    }

    fn require_id(&self) -> Result<IdOf<G>, ApiError> {
        self.id().ok_or_else(|| {
            ApiError::invalid(format!(
                "No {} ID provided",
                Self::kind().to_lowercase()
            ))
        })
    }

    /// Store a mutation result: `stored` maps success to the entity to keep,
    /// failure records the message.
    fn settle<R>(
        &self,
        result: Result<R, ApiError>,
        stored: impl FnOnce(&R) -> Option<G::Item>,
    ) -> Result<R, ApiError> {
        let mut state = self.inner.state.lock();
        match result {
            Ok(value) => {
                state.view.entity = stored(&value);
                self.publish(&state);
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "entity mutation failed");
                state.view.error = Some(err.message.clone());
                self.publish(&state);
                Err(err)
            }
        }
    }

    fn kind() -> &'static str {
        <G::Item as Resource>::KIND
    }

    fn publish(&self, state: &HandleState<G>) {
        let _ = self.inner.tx.send_replace(state.view.clone());
    }
}

impl<G> ResourceHandle<G>
where
    G: ResourceGateway<Item = Task, Patch = TaskPatch>,
{
    /// Update only the status.
    pub async fn set_status(&self, status: TaskStatus) -> Result<Task, ApiError> {
        self.edit(&TaskPatch::status(status)).await
    }

    /// Update only the priority.
    pub async fn set_priority(&self, priority: TaskPriority) -> Result<Task, ApiError> {
        self.edit(&TaskPatch::priority(priority)).await
    }
}

impl<G> ResourceHandle<G>
where
    G: ResourceGateway<Item = Task> + AssignTasks,
{
    /// Assign the task to `user`.
    pub async fn assign(&self, user: &UserId) -> Result<Task, ApiError> {
        let id = self.require_id()?;
        let result = self.inner.gateway.assign(&id, user).await;
        self.settle(result, |task| Some(task.clone()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

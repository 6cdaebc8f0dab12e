//! Descriptor-driven collection of one resource kind.
//!
//! A [`Collection`] owns the list for exactly one [`ListDescriptor`] at a
//! time. Every fetch is tagged with a generation number; a response whose
//! generation is no longer current is dropped, so a slow response for an old
//! descriptor can never overwrite the result of a newer one.
//!
//! Mutations go to the server first and touch local state only after it
//! confirms. Nothing is applied optimistically.

use std::sync::Arc;

use parking_lot::Mutex;
use taskhub_client::{ApiError, IdOf, ListSource, ResourceGateway};
use taskhub_core::{ListDescriptor, Page, Resource};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::snapshot::{Phase, Snapshot};

/// Result of one fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The fetch landed and replaced the items.
    Loaded {
        /// Number of items received.
        count: usize,
    },
    /// The descriptor matched the one already applied; nothing was fetched.
    Unchanged,
    /// A newer fetch was issued while this one was in flight; its response was dropped.
    Stale,
    /// The fetch failed; previous items were kept.
    Failed(ApiError),
}

impl FetchOutcome {
    /// Whether this fetch replaced the items.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

struct State<T> {
    snapshot: Snapshot<T>,
    generation: u64,
    applied_key: Option<String>,
}

struct Inner<G: ListSource> {
    gateway: G,
    state: Mutex<State<G::Item>>,
    tx: watch::Sender<Snapshot<G::Item>>,
}

/// Client-side view of a server collection, shared by cloning.
pub struct Collection<G: ListSource> {
    inner: Arc<Inner<G>>,
}

impl<G: ListSource> Clone for Collection<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: ListSource> std::fmt::Debug for Collection<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Collection")
            .field("kind", &Self::kind())
            .field("items", &state.snapshot.items.len())
            .field("phase", &state.snapshot.phase)
            .field("generation", &state.generation)
            .finish_non_exhaustive()
    }
}

impl<G: ListSource> Collection<G> {
    /// Idle collection with an empty descriptor. Nothing is fetched until
    /// [`apply`](Self::apply) or [`refetch`](Self::refetch).
    pub fn new(gateway: G) -> Self {
        Self::with_descriptor(gateway, ListDescriptor::default())
    }

    /// Idle collection that will fetch `descriptor` on the first [`refetch`](Self::refetch).
    pub fn with_descriptor(gateway: G, descriptor: ListDescriptor) -> Self {
        let snapshot = Snapshot {
            descriptor,
            ..Snapshot::default()
        };
        let (tx, _) = watch::channel(snapshot.clone());
        Self {
            inner: Arc::new(Inner {
                gateway,
                state: Mutex::new(State {
                    snapshot,
                    generation: 0,
                    applied_key: None,
                }),
                tx,
            }),
        }
    }

    /// The underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.inner.gateway
    }

    /// Current state.
    pub fn snapshot(&self) -> Snapshot<G::Item> {
        self.inner.state.lock().snapshot.clone()
    }

    /// Receiver that sees every published state change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<G::Item>> {
        self.inner.tx.subscribe()
    }

    /// Descriptor currently applied.
    pub fn descriptor(&self) -> ListDescriptor {
        self.inner.state.lock().snapshot.descriptor.clone()
    }

    /// Switch to `descriptor` and fetch, unless it equals (by value) the one
    /// already fetched for. A failed fetch does not count, so applying the
    /// same descriptor again retries.
    pub async fn apply(&self, descriptor: ListDescriptor) -> FetchOutcome {
        let key = descriptor.cache_key();
        {
            let mut state = self.inner.state.lock();
            if state.applied_key.as_deref() == Some(key.as_str()) {
                debug!(kind = Self::kind(), "descriptor unchanged, skipping fetch");
                return FetchOutcome::Unchanged;
            }
            state.snapshot.descriptor = descriptor;
        }
        self.refetch().await
    }

    /// Fetch the current descriptor again, unconditionally.
    #[tracing::instrument(skip_all, fields(kind = Self::kind()))]
    pub async fn refetch(&self) -> FetchOutcome {
        let (generation, descriptor) = {
            let mut state = self.inner.state.lock();
            state.generation += 1;
            state.applied_key = Some(state.snapshot.descriptor.cache_key());
            state.snapshot.phase = Phase::Loading;
            state.snapshot.error = None;
            self.publish(&state);
            (state.generation, state.snapshot.descriptor.clone())
        };

        let result = self.inner.gateway.list(&descriptor).await;
        self.finish(generation, result)
    }

    fn finish(&self, generation: u64, result: Result<Page<G::Item>, ApiError>) -> FetchOutcome {
        let mut state = self.inner.state.lock();
        if state.generation != generation {
            debug!(generation, current = state.generation, "dropping stale response");
            return FetchOutcome::Stale;
        }
        let outcome = match result {
            Ok(page) => {
                let count = page.items.len();
                state.snapshot.items = page.items;
                state.snapshot.pagination = page.pagination;
                state.snapshot.phase = Phase::Ready;
                debug!(count, "collection loaded");
                FetchOutcome::Loaded { count }
            }
            Err(err) => {
                warn!(error = %err, "collection fetch failed");
                state.snapshot.error = Some(err.message.clone());
                state.snapshot.phase = Phase::Failed;
                state.applied_key = None;
                FetchOutcome::Failed(err)
            }
        };
        self.publish(&state);
        outcome
    }

    /// Forget the last error message.
    pub fn clear_error(&self) {
        self.update(|snapshot| snapshot.error = None);
    }

    /// Drop every held item and the pagination, keeping the phase.
    pub(crate) fn clear_items(&self) {
        self.update(|snapshot| {
            snapshot.items.clear();
            snapshot.pagination = None;
        });
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut Snapshot<G::Item>)) {
        let mut state = self.inner.state.lock();
        f(&mut state.snapshot);
        self.publish(&state);
    }

    pub(crate) fn record_failure(&self, err: &ApiError) {
        warn!(kind = Self::kind(), error = %err, "mutation failed");
        self.update(|snapshot| snapshot.error = Some(err.message.clone()));
    }

    fn kind() -> &'static str {
        <G::Item as Resource>::KIND
    }

    fn publish(&self, state: &State<G::Item>) {
        let _ = self.inner.tx.send_replace(state.snapshot.clone());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mutations
// ─────────────────────────────────────────────────────────────────────────────

impl<G: ResourceGateway> Collection<G> {
    /// Create an entity and append the server's copy.
    ///
    /// If an entity with the same id is already held (a refetch raced the
    /// create), it is replaced instead.
    pub async fn add(&self, draft: &G::Draft) -> Result<G::Item, ApiError> {
        match self.inner.gateway.create(draft).await {
            Ok(item) => {
                let created = item.clone();
                self.update(|snapshot| {
                    if let Some(slot) = snapshot.items.iter_mut().find(|i| i.id() == item.id()) {
                        *slot = item;
                    } else {
                        snapshot.items.push(item);
                    }
                });
                Ok(created)
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Update an entity and replace the held copy in place.
    pub async fn edit(&self, id: &IdOf<G>, patch: &G::Patch) -> Result<G::Item, ApiError> {
        match self.inner.gateway.update(id, patch).await {
            Ok(item) => {
                self.replace(id, item.clone());
                Ok(item)
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Delete an entity and drop it from the held items.
    pub async fn remove(&self, id: &IdOf<G>) -> Result<Option<G::Item>, ApiError> {
        match self.inner.gateway.remove(id).await {
            Ok(removed) => {
                self.update(|snapshot| snapshot.items.retain(|i| i.id() != id));
                Ok(removed)
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Replace the entity with `id`; entities not held are ignored.
    pub(crate) fn replace(&self, id: &IdOf<G>, item: G::Item) {
        self.update(|snapshot| {
            if let Some(slot) = snapshot.items.iter_mut().find(|i| i.id() == id) {
                *slot = item;
            }
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

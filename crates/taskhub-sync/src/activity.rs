//! Paged, read-only activity feed of one project.

use taskhub_client::ListSource;
use taskhub_core::{Activity, ListDescriptor, ProjectId};
use tokio::sync::watch;

use crate::collection::{Collection, FetchOutcome};
use crate::snapshot::Snapshot;

/// Activity of one project, one page at a time.
///
/// The feed is optional: a failed load leaves it empty instead of showing
/// the previous page.
#[derive(Debug, Clone)]
pub struct ActivityFeed<G: ListSource<Item = Activity>> {
    collection: Collection<G>,
    project: ProjectId,
    page_size: u32,
}

impl<G: ListSource<Item = Activity>> ActivityFeed<G> {
    /// Feed for `project` with `page_size` entries per page.
    pub fn new(gateway: G, project: ProjectId, page_size: u32) -> Self {
        Self {
            collection: Collection::new(gateway),
            project,
            page_size: page_size.max(1),
        }
    }

    /// Project this feed belongs to.
    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    /// Current state.
    pub fn snapshot(&self) -> Snapshot<Activity> {
        self.collection.snapshot()
    }

    /// Receiver that sees every published state change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Activity>> {
        self.collection.subscribe()
    }

    /// Load `page` (1-based).
    pub async fn load(&self, page: u32) -> FetchOutcome {
        let descriptor = ListDescriptor::new()
            .with_project(self.project.clone())
            .with_page(page.max(1), self.page_size);
        let outcome = self.collection.apply(descriptor).await;
        if matches!(outcome, FetchOutcome::Failed(_)) {
            self.collection.clear_items();
        }
        outcome
    }

    /// Reload the current page.
    pub async fn reload(&self) -> FetchOutcome {
        let outcome = self.collection.refetch().await;
        if matches!(outcome, FetchOutcome::Failed(_)) {
            self.collection.clear_items();
        }
        outcome
    }

    /// Load the next page, if the server reported one.
    pub async fn next_page(&self) -> Option<FetchOutcome> {
        let pagination = self.snapshot().pagination?;
        if !pagination.has_next() {
            return None;
        }
        Some(self.load(pagination.current_page + 1).await)
    }

    /// Load the previous page, if any.
    pub async fn previous_page(&self) -> Option<FetchOutcome> {
        let pagination = self.snapshot().pagination?;
        if !pagination.has_previous() {
            return None;
        }
        Some(self.load(pagination.current_page - 1).await)
    }
}

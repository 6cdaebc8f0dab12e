//! Debounced descriptor changes for search-as-you-type.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use taskhub_client::ListSource;
use taskhub_core::ListDescriptor;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::collection::{Collection, FetchOutcome};

/// Applies only the last descriptor submitted within the debounce window.
///
/// Each submission takes a ticket; when its delay elapses it applies its
/// descriptor only if no newer ticket was issued in the meantime.
pub struct SearchDebouncer<G: ListSource> {
    collection: Collection<G>,
    delay: Duration,
    ticket: Arc<AtomicU64>,
}

impl<G: ListSource> Clone for SearchDebouncer<G> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            delay: self.delay,
            ticket: Arc::clone(&self.ticket),
        }
    }
}

impl<G: ListSource> std::fmt::Debug for SearchDebouncer<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDebouncer")
            .field("delay", &self.delay)
            .field("ticket", &self.ticket.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<G: ListSource> SearchDebouncer<G> {
    /// Debouncer in front of `collection`.
    pub fn new(collection: Collection<G>, delay: Duration) -> Self {
        Self {
            collection,
            delay,
            ticket: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The debounced collection.
    pub fn collection(&self) -> &Collection<G> {
        &self.collection
    }

    /// Schedule `descriptor`. The handle resolves to `None` if a later
    /// submission superseded this one.
    pub fn submit(&self, descriptor: ListDescriptor) -> JoinHandle<Option<FetchOutcome>> {
        let mine = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let ticket = Arc::clone(&self.ticket);
        let collection = self.collection.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if ticket.load(Ordering::SeqCst) != mine {
                debug!(ticket = mine, "superseded descriptor dropped");
                return None;
            }
            Some(collection.apply(descriptor).await)
        })
    }

    /// Schedule a search for `text` on top of the current descriptor.
    ///
    /// A paginated descriptor goes back to page 1.
    pub fn search(&self, text: &str) -> JoinHandle<Option<FetchOutcome>> {
        let mut descriptor = self.collection.descriptor();
        descriptor.search = Some(text.to_string());
        if descriptor.page.is_some() {
            descriptor.page = Some(1);
        }
        self.submit(descriptor)
    }

    /// Drop any pending submission.
    pub fn cancel(&self) {
        let _ = self.ticket.fetch_add(1, Ordering::SeqCst);
    }
}

//! What observers see: the collection state at one instant.

use taskhub_core::{ListDescriptor, Pagination, Resource, Task, TaskStatus};

/// Fetch lifecycle of a collection.
///
/// `Idle` until the first fetch; every fetch moves through `Loading` to
/// exactly one of `Ready` or `Failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// A fetch is in flight; the previous items stay visible.
    Loading,
    /// The last fetch succeeded.
    Ready,
    /// The last fetch failed; the previous items stay visible.
    Failed,
}

/// Immutable view of a collection.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    /// Entities in fetch/creation order.
    pub items: Vec<T>,
    /// Server pagination from the last successful fetch, if it sent any.
    pub pagination: Option<Pagination>,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Message of the last failed fetch or mutation.
    pub error: Option<String>,
    /// Descriptor the items were (or are being) fetched for.
    pub descriptor: ListDescriptor,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
            phase: Phase::Idle,
            error: None,
            descriptor: ListDescriptor::default(),
        }
    }
}

impl<T> Snapshot<T> {
    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Number of entities held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no entities are held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Client-side page of the held items, for backends that return the full
    /// list without pagination.
    ///
    /// `page` is clamped into range and the derived pagination always has at
    /// least one page.
    pub fn visible_page(&self, page: u32, limit: u32) -> (&[T], Pagination) {
        let pagination = Pagination::local(self.items.len(), page, limit);
        let start = pagination.offset().min(self.items.len());
        let per_page = usize::try_from(pagination.items_per_page).unwrap_or(usize::MAX);
        let end = start.saturating_add(per_page).min(self.items.len());
        (&self.items[start..end], pagination)
    }
}

impl<T: Resource> Snapshot<T> {
    /// Look up an entity by id.
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Whether an entity with `id` is held.
    pub fn contains(&self, id: &T::Id) -> bool {
        self.get(id).is_some()
    }
}

/// Number of tasks per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// `todo`
    pub todo: usize,
    /// `in_progress`
    pub in_progress: usize,
    /// `completed`
    pub completed: usize,
    /// `cancelled`
    pub cancelled: usize,
}

impl StatusCounts {
    /// Count for one status.
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
            TaskStatus::Cancelled => self.cancelled,
        }
    }

    /// Total across all statuses.
    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.completed + self.cancelled
    }
}

impl Snapshot<Task> {
    /// Tasks per status.
    pub fn status_counts(&self) -> StatusCounts {
        self.items
            .iter()
            .fold(StatusCounts::default(), |mut counts, task| {
                match task.status {
                    TaskStatus::Todo => counts.todo += 1,
                    TaskStatus::InProgress => counts.in_progress += 1,
                    TaskStatus::Completed => counts.completed += 1,
                    TaskStatus::Cancelled => counts.cancelled += 1,
                }
                counts
            })
    }

    /// Completed tasks as a rounded percentage of all held tasks; 0 when empty.
    pub fn progress_percent(&self) -> u8 {
        let counts = self.status_counts();
        let total = counts.total();
        if total == 0 {
            return 0;
        }
        // (2c*100 + t) / 2t rounds half up without floats
        let pct = (counts.completed * 200 + total) / (total * 2);
        u8::try_from(pct).unwrap_or(100)
    }

    /// Tasks with `status`, in collection order.
    pub fn with_status(&self, status: TaskStatus) -> impl Iterator<Item = &Task> {
        self.items.iter().filter(move |t| t.status == status)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! In-memory gateways for sync-layer tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use taskhub_client::{ApiError, AssignTasks, IdOf, ListSource, ResourceGateway};
use taskhub_core::{
    ListDescriptor, Page, Pagination, Project, ProjectDraft, ProjectPatch, Resource, Task, TaskDraft,
    TaskId, TaskPatch, TaskStatus, UserId, UserRef,
};

pub(crate) fn task(id: u64, status: TaskStatus) -> Task {
    let mut t = Task::new(TaskId::from(id), format!("Task {id}"));
    t.status = status;
    t
}

pub(crate) fn project(id: &str, name: &str) -> Project {
    serde_json::from_value(json!({"_id": id, "name": name, "description": format!("{name} project")}))
        .unwrap()
}

/// How a fake builds, patches and filters one entity kind.
pub(crate) trait FakeEntity: Resource {
    type Draft: Send + Sync + 'static;
    type Patch: Clone + Send + Sync + 'static;

    fn create(seq: u64, draft: &Self::Draft) -> Self;
    fn patch(&mut self, patch: &Self::Patch);
    fn matches(&self, descriptor: &ListDescriptor) -> bool;
}

impl FakeEntity for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    fn create(seq: u64, draft: &TaskDraft) -> Self {
        let mut t = Task::new(TaskId::from(seq), draft.title.clone());
        t.description = draft.description.clone();
        t.status = draft.status.unwrap_or_default();
        t.priority = draft.priority.unwrap_or_default();
        t.project_id = draft.project_id.clone();
        t
    }

    fn patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(user) = &patch.assigned_to {
            self.assigned_to = Some(UserRef::Id(user.clone()));
        }
    }

    fn matches(&self, d: &ListDescriptor) -> bool {
        let d = d.normalized();
        d.status.is_none_or(|s| s == self.status)
            && d.priority.is_none_or(|p| p == self.priority)
            && d.assigned_to.as_ref().is_none_or(|u| self.assignee_id() == Some(u))
            && d.project_id.as_ref().is_none_or(|p| self.project_id.as_ref() == Some(p))
            && d.search
                .as_ref()
                .is_none_or(|q| self.title.to_lowercase().contains(&q.to_lowercase()))
    }
}

impl FakeEntity for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    fn create(seq: u64, draft: &ProjectDraft) -> Self {
        let mut p = project(&format!("p{seq}"), &draft.name);
        p.description = draft.description.clone();
        p
    }

    fn patch(&mut self, patch: &ProjectPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn matches(&self, d: &ListDescriptor) -> bool {
        d.normalized()
            .search
            .as_ref()
            .is_none_or(|q| self.name.to_lowercase().contains(&q.to_lowercase()))
    }
}

struct FakeState<T: FakeEntity> {
    items: Mutex<Vec<T>>,
    pagination: Mutex<Option<Pagination>>,
    list_calls: AtomicUsize,
    list_failure: Mutex<Option<ApiError>>,
    mutation_failure: Mutex<Option<ApiError>>,
    delays: Mutex<Vec<(String, Duration)>>,
    patches: Mutex<Vec<T::Patch>>,
    seq: AtomicU64,
}

/// Server double holding entities in memory.
pub(crate) struct FakeGateway<T: FakeEntity> {
    state: Arc<FakeState<T>>,
}

pub(crate) type FakeTasks = FakeGateway<Task>;
pub(crate) type FakeProjects = FakeGateway<Project>;

impl<T: FakeEntity> Clone for FakeGateway<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: FakeEntity> FakeGateway<T> {
    pub(crate) fn with(items: Vec<T>) -> Self {
        Self {
            state: Arc::new(FakeState {
                items: Mutex::new(items),
                pagination: Mutex::new(None),
                list_calls: AtomicUsize::new(0),
                list_failure: Mutex::new(None),
                mutation_failure: Mutex::new(None),
                delays: Mutex::new(Vec::new()),
                patches: Mutex::new(Vec::new()),
                seq: AtomicU64::new(1000),
            }),
        }
    }

    pub(crate) fn set_pagination(&self, pagination: Option<Pagination>) {
        *self.state.pagination.lock() = pagination;
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_next_list(&self, err: ApiError) {
        *self.state.list_failure.lock() = Some(err);
    }

    pub(crate) fn fail_next_mutation(&self, err: ApiError) {
        *self.state.mutation_failure.lock() = Some(err);
    }

    /// Delay list responses whose descriptor key contains `needle`.
    pub(crate) fn delay_for(&self, needle: &str, delay: Duration) {
        self.state.delays.lock().push((needle.to_string(), delay));
    }

    pub(crate) fn last_patch(&self) -> Option<T::Patch> {
        self.state.patches.lock().last().cloned()
    }

    fn take_mutation_failure(&self) -> Result<(), ApiError> {
        match self.state.mutation_failure.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::not_found(format!("{} not found", T::KIND), Some(404))
    }

    fn patch_held(&self, id: &T::Id, patch: &T::Patch) -> Result<T, ApiError> {
        let mut items = self.state.items.lock();
        let item = items.iter_mut().find(|i| i.id() == id).ok_or_else(Self::not_found)?;
        item.patch(patch);
        Ok(item.clone())
    }
}

#[async_trait]
impl<T: FakeEntity> ListSource for FakeGateway<T> {
    type Item = T;

    async fn list(&self, descriptor: &ListDescriptor) -> Result<Page<T>, ApiError> {
        let _ = self.state.list_calls.fetch_add(1, Ordering::SeqCst);
        let key = descriptor.cache_key();
        let delay = self
            .state
            .delays
            .lock()
            .iter()
            .find(|(needle, _)| key.contains(needle.as_str()))
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.state.list_failure.lock().take() {
            return Err(err);
        }
        let items: Vec<T> = self
            .state
            .items
            .lock()
            .iter()
            .filter(|i| i.matches(descriptor))
            .cloned()
            .collect();
        Ok(Page {
            items,
            pagination: *self.state.pagination.lock(),
        })
    }
}

#[async_trait]
impl<T: FakeEntity> ResourceGateway for FakeGateway<T> {
    type Draft = T::Draft;
    type Patch = T::Patch;

    async fn get(&self, id: &IdOf<Self>) -> Result<T, ApiError> {
        self.state
            .items
            .lock()
            .iter()
            .find(|i| i.id() == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create(&self, draft: &T::Draft) -> Result<T, ApiError> {
        self.take_mutation_failure()?;
        let seq = self.state.seq.fetch_add(1, Ordering::SeqCst);
        let item = T::create(seq, draft);
        self.state.items.lock().push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: &IdOf<Self>, patch: &T::Patch) -> Result<T, ApiError> {
        self.take_mutation_failure()?;
        self.state.patches.lock().push(patch.clone());
        self.patch_held(id, patch)
    }

    async fn remove(&self, id: &IdOf<Self>) -> Result<Option<T>, ApiError> {
        self.take_mutation_failure()?;
        let mut items = self.state.items.lock();
        let pos = items.iter().position(|i| i.id() == id).ok_or_else(Self::not_found)?;
        Ok(Some(items.remove(pos)))
    }
}

#[async_trait]
impl AssignTasks for FakeGateway<Task> {
    async fn assign(&self, id: &TaskId, user: &UserId) -> Result<Task, ApiError> {
        self.take_mutation_failure()?;
        let patch = TaskPatch {
            assigned_to: Some(user.clone()),
            ..TaskPatch::default()
        };
        self.patch_held(id, &patch)
    }
}

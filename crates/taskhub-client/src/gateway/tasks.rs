//! `/tasks` gateway.

use async_trait::async_trait;
use serde_json::json;
use taskhub_core::{ListDescriptor, Page, Task, TaskDraft, TaskId, TaskPatch, UserId, Validate};

use super::{ApiClient, ListSource, ResourceGateway, to_body};
use crate::errors::ApiError;
use crate::transport::ApiRequest;

/// Tasks.
#[derive(Debug, Clone)]
pub struct TasksGateway {
    api: ApiClient,
}

impl TasksGateway {
    /// Gateway over `api`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

/// Gateways that can reassign a task.
#[async_trait]
pub trait AssignTasks: Send + Sync {
    /// Assign task `id` to `user`; returns the updated task.
    async fn assign(&self, id: &TaskId, user: &UserId) -> Result<Task, ApiError>;
}

#[async_trait]
impl AssignTasks for TasksGateway {
    #[tracing::instrument(skip_all, fields(id = %id, user = %user))]
    async fn assign(&self, id: &TaskId, user: &UserId) -> Result<Task, ApiError> {
        let request = ApiRequest::patch(format!("/tasks/{id}/assign"), json!({ "assignedTo": user }));
        self.api
            .fetch_entity(request, "task", "Failed to assign task")
            .await
    }
}

#[async_trait]
impl ListSource for TasksGateway {
    type Item = Task;

    #[tracing::instrument(skip_all)]
    async fn list(&self, descriptor: &ListDescriptor) -> Result<Page<Task>, ApiError> {
        let request =
            ApiRequest::get("/tasks").with_query(descriptor.query_pairs(self.api.dialect()));
        self.api.fetch_list(request, "Failed to fetch tasks").await
    }
}

#[async_trait]
impl ResourceGateway for TasksGateway {
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    #[tracing::instrument(skip_all, fields(id = %id))]
    async fn get(&self, id: &TaskId) -> Result<Task, ApiError> {
        self.api
            .fetch_existing(
                ApiRequest::get(format!("/tasks/{id}")),
                "task",
                "Failed to fetch task",
                "Task not found",
            )
            .await
    }

    #[tracing::instrument(skip_all)]
    async fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        draft.validate()?;
        let request = ApiRequest::post("/tasks", to_body(&draft.with_defaults())?);
        self.api
            .fetch_entity(request, "task", "Failed to create task")
            .await
    }

    #[tracing::instrument(skip_all, fields(id = %id))]
    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        patch.validate()?;
        let request = ApiRequest::put(format!("/tasks/{id}"), to_body(patch)?);
        self.api
            .fetch_entity(request, "task", "Failed to update task")
            .await
    }

    #[tracing::instrument(skip_all, fields(id = %id))]
    async fn remove(&self, id: &TaskId) -> Result<Option<Task>, ApiError> {
        self.api
            .fetch_optional(
                ApiRequest::delete(format!("/tasks/{id}")),
                "task",
                "Failed to delete task",
            )
            .await
    }
}

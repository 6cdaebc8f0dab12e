//! Task-specific collection operations.

use taskhub_client::{ApiError, AssignTasks, ResourceGateway};
use taskhub_core::{Task, TaskId, TaskPatch, TaskPriority, TaskStatus, UserId};

use crate::collection::Collection;

impl<G> Collection<G>
where
    G: ResourceGateway<Item = Task, Patch = TaskPatch>,
{
    /// Update only the status of a task.
    pub async fn set_status(&self, id: &TaskId, status: TaskStatus) -> Result<Task, ApiError> {
        self.edit(id, &TaskPatch::status(status)).await
    }

    /// Update only the priority of a task.
    pub async fn set_priority(&self, id: &TaskId, priority: TaskPriority) -> Result<Task, ApiError> {
        self.edit(id, &TaskPatch::priority(priority)).await
    }

    /// Flip a task between done and in progress.
    pub async fn toggle_completion(&self, task: &Task) -> Result<Task, ApiError> {
        self.set_status(&task.id, task.status.toggled()).await
    }
}

impl<G> Collection<G>
where
    G: ResourceGateway<Item = Task> + AssignTasks,
{
    /// Assign a task and replace the held copy with the server's.
    pub async fn assign(&self, id: &TaskId, user: &UserId) -> Result<Task, ApiError> {
        match self.gateway().assign(id, user).await {
            Ok(task) => {
                self.replace(id, task.clone());
                Ok(task)
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use taskhub_core::Pagination;

    use super::*;
    use crate::testing::{FakeTasks, task};

    #[tokio::test]
    async fn set_status_sends_only_status() {
        let fake = FakeTasks::with(vec![task(1, TaskStatus::Todo), task(2, TaskStatus::Todo)]);
        fake.set_pagination(Some(Pagination::local(2, 1, 6)));
        let c = Collection::new(fake.clone());
        let _ = c.refetch().await;
        let pagination = c.snapshot().pagination;

        let updated = c.set_status(&TaskId::from(1), TaskStatus::Completed).await.unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);

        let patch = fake.last_patch().unwrap();
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"status": "completed"}));

        let snap = c.snapshot();
        assert_eq!(snap.items[0].status, TaskStatus::Completed);
        assert_eq!(snap.items[1].status, TaskStatus::Todo);
        assert_eq!(snap.pagination, pagination);
    }

    #[tokio::test]
    async fn set_priority_sends_only_priority() {
        let fake = FakeTasks::with(vec![task(1, TaskStatus::Todo)]);
        let c = Collection::new(fake.clone());
        let _ = c.refetch().await;

        let _ = c.set_priority(&TaskId::from(1), TaskPriority::High).await.unwrap();
        let patch = fake.last_patch().unwrap();
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"priority": "high"}));
        assert_eq!(c.snapshot().items[0].priority, TaskPriority::High);
    }

    #[tokio::test]
    async fn toggle_completion_round_trips() {
        let fake = FakeTasks::with(vec![task(1, TaskStatus::Todo)]);
        let c = Collection::new(fake.clone());
        let _ = c.refetch().await;

        let done = c.toggle_completion(&c.snapshot().items[0]).await.unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        let reopened = c.toggle_completion(&done).await.unwrap();
        assert_eq!(reopened.status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn assign_replaces_in_place() {
        let fake = FakeTasks::with(vec![task(1, TaskStatus::Todo), task(2, TaskStatus::Todo)]);
        let c = Collection::new(fake.clone());
        let _ = c.refetch().await;

        let user = UserId::from("u7");
        let _ = c.assign(&TaskId::from(2), &user).await.unwrap();
        let snap = c.snapshot();
        assert_eq!(snap.items[1].assignee_id(), Some(&user));
        assert!(snap.items[0].assignee_id().is_none());
    }

    #[tokio::test]
    async fn failed_status_change_keeps_old_status() {
        let fake = FakeTasks::with(vec![task(1, TaskStatus::Todo)]);
        let c = Collection::new(fake.clone());
        let _ = c.refetch().await;

        fake.fail_next_mutation(ApiError::rejected("Failed to update task", 500));
        let err = c.set_status(&TaskId::from(1), TaskStatus::Completed).await.unwrap_err();
        assert_eq!(err.message, "Failed to update task");
        let snap = c.snapshot();
        assert_eq!(snap.items[0].status, TaskStatus::Todo);
        assert_eq!(snap.error.as_deref(), Some("Failed to update task"));
    }
}

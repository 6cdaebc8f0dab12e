//! Domain types for the project/task backend.
//!
//! All serializable types use `camelCase` for wire compatibility. Entity
//! types accept the backend's `_id` key as an alias for `id`, and keep any
//! field they do not model in `extra`, so re-serializing an entity (or
//! patching it locally) never loses data the server sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{ActivityId, EntityId, MemberId, ProjectId, TaskId, UserId};
use crate::status::{TaskPriority, TaskStatus};

// ─────────────────────────────────────────────────────────────────────────────
// Resource trait
// ─────────────────────────────────────────────────────────────────────────────

/// An entity that lives in a keyed collection.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Identifier type.
    type Id: Clone + Eq + std::hash::Hash + std::fmt::Display + Send + Sync + 'static;

    /// Human-readable kind, used in messages ("Task", "Project").
    const KIND: &'static str;

    /// This entity's identifier.
    fn id(&self) -> &Self::Id;
}

// ─────────────────────────────────────────────────────────────────────────────
// Users and members
// ─────────────────────────────────────────────────────────────────────────────

/// Account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Owns projects and can manage members.
    Owner,
    /// Administrative access.
    Admin,
    /// Regular member.
    #[default]
    #[serde(other)]
    Member,
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account ID.
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    pub email: String,
    /// Account role.
    #[serde(default)]
    pub role: UserRole,
}

impl User {
    /// Whether this account may create projects and tasks for others.
    pub fn is_owner(&self) -> bool {
        matches!(self.role, UserRole::Owner | UserRole::Admin)
    }
}

/// Compact user reference embedded in tasks and activity entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Account ID.
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A user reference that is either a bare ID or a populated summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    /// Bare ID.
    Id(UserId),
    /// Populated user.
    Summary(UserSummary),
}

impl UserRef {
    /// The referenced user's ID.
    pub fn id(&self) -> &UserId {
        match self {
            Self::Id(id) => id,
            Self::Summary(summary) => &summary.id,
        }
    }

    /// Display name when populated.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Summary(summary) => Some(summary.name.as_str()),
        }
    }
}

/// Role within one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Project owner.
    Owner,
    /// Project admin.
    Admin,
    /// Regular member.
    #[default]
    #[serde(other)]
    Member,
}

/// A project member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Membership (or user) ID.
    #[serde(alias = "_id")]
    pub id: MemberId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email.
    #[serde(default)]
    pub email: String,
    /// Role in the project.
    #[serde(default)]
    pub role: MemberRole,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Projects
// ─────────────────────────────────────────────────────────────────────────────

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Not started yet.
    #[default]
    Planning,
    /// Being worked on.
    Active,
    /// Paused.
    #[serde(alias = "on-hold")]
    OnHold,
    /// Finished.
    Completed,
    /// Archived.
    Archived,
    /// A status this client does not know.
    #[serde(other)]
    Unknown,
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "planning" => Ok(Self::Planning),
            "active" => Ok(Self::Active),
            "on_hold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown project status: {other}")),
        }
    }
}

/// A project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ID.
    #[serde(alias = "_id")]
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ProjectStatus,
    /// Owner reference.
    #[serde(default, alias = "createdBy", skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserRef>,
    /// Members, including the owner.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Total tasks, when the backend computes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_count: Option<u32>,
    /// Completed tasks, when the backend computes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_tasks: Option<u32>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// Whether `user` owns this project.
    ///
    /// Checks the owner reference, then a bare `ownerId` the backend may send
    /// alongside it.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        if self.owner.as_ref().is_some_and(|o| o.id() == user) {
            return true;
        }
        self.extra
            .get("ownerId")
            .and_then(|v| serde_json::from_value::<UserId>(v.clone()).ok())
            .is_some_and(|id| &id == user)
    }

    /// Find a member by ID.
    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == id)
    }
}

impl Resource for Project {
    type Id = ProjectId;
    const KIND: &'static str = "Project";

    fn id(&self) -> &ProjectId {
        &self.id
    }
}

/// Fields for creating a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    /// Project name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial project update; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl ProjectPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tasks
// ─────────────────────────────────────────────────────────────────────────────

/// A task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task ID.
    #[serde(alias = "_id")]
    pub id: TaskId,
    /// Owning project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    /// Short title.
    pub title: String,
    /// Detailed description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Workflow status.
    #[serde(default)]
    pub status: TaskStatus,
    /// Priority.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Assignee reference.
    #[serde(default, alias = "assigneeId", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserRef>,
    /// Populated assignee, when sent separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserSummary>,
    /// Due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// A minimal task, mostly useful for tests and fixtures.
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_id: None,
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            assigned_to: None,
            assignee: None,
            due_date: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// ID of the assignee, from whichever field carries it.
    pub fn assignee_id(&self) -> Option<&UserId> {
        self.assigned_to
            .as_ref()
            .map(UserRef::id)
            .or_else(|| self.assignee.as_ref().map(|a| &a.id))
    }

    /// Whether the task is past due and still open at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && self.due_date.is_some_and(|due| due < now)
    }
}

impl Resource for Task {
    type Id = TaskId;
    const KIND: &'static str = "Task";

    fn id(&self) -> &TaskId {
        &self.id
    }
}

/// Fields for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Owning project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    /// Title.
    pub title: String,
    /// Description (sent as `""` when absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial status (defaults to `todo`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Priority (defaults to `medium`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// Due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserId>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl TaskDraft {
    /// Copy with the creation defaults filled in: empty description,
    /// `todo` status, `medium` priority.
    #[must_use]
    pub fn with_defaults(&self) -> Self {
        Self {
            description: Some(self.description.clone().unwrap_or_default()),
            status: Some(self.status.unwrap_or_default()),
            priority: Some(self.priority.unwrap_or_default()),
            ..self.clone()
        }
    }

    /// Add a tag unless it is blank or already present. Returns whether it was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }
}

/// Partial task update; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// New due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// New assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserId>,
    /// Replacement tag list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    /// A patch that only changes the status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// A patch that only changes the priority.
    pub fn priority(priority: TaskPriority) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.assigned_to.is_none()
            && self.tags.is_none()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Activity
// ─────────────────────────────────────────────────────────────────────────────

/// One entry of a project's activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Entry ID.
    #[serde(alias = "_id")]
    pub id: ActivityId,
    /// Project the entry belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    /// Acting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    /// What happened ("created", "updated", "added", ...).
    pub action: String,
    /// Kind of entity affected ("task", "member", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    /// ID of the affected entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    /// Display name of the affected entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    /// When it happened.
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Activity {
    type Id = ActivityId;
    const KIND: &'static str = "Activity";

    fn id(&self) -> &ActivityId {
        &self.id
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth requests
// ─────────────────────────────────────────────────────────────────────────────

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Signup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

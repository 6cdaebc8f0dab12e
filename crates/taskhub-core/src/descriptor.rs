//! List descriptors: the combined filter/sort/page configuration that drives
//! a list fetch.
//!
//! Every field is optional; `None` means "no constraint on this dimension".
//! Blank strings are treated exactly like `None`, both when building the
//! query string and when comparing descriptors, so `search: Some("")` never
//! reaches the backend and never triggers a refetch on its own.

use serde::{Deserialize, Serialize};

use crate::ids::{ProjectId, UserId};
use crate::status::{StatusDialect, TaskPriority, TaskStatus};

/// Field a list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Task title.
    Title,
    /// Project name.
    Name,
    /// Task due date.
    DueDate,
    /// Task priority.
    Priority,
    /// Workflow status.
    Status,
    /// Creation time.
    CreatedAt,
    /// Last update time.
    UpdatedAt,
}

impl SortField {
    /// Query-string value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Name => "name",
            Self::DueDate => "dueDate",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "title" => Ok(Self::Title),
            "name" => Ok(Self::Name),
            "dueDate" | "due_date" | "due-date" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "createdAt" | "created_at" | "created-at" => Ok(Self::CreatedAt),
            "updatedAt" | "updated_at" | "updated-at" => Ok(Self::UpdatedAt),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Query-string value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Filter/sort/page configuration for one list fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDescriptor {
    /// Task status filter.
    pub status: Option<TaskStatus>,
    /// Task priority filter.
    pub priority: Option<TaskPriority>,
    /// Assignee filter.
    pub assigned_to: Option<UserId>,
    /// Owning project filter (also selects the activity feed).
    pub project_id: Option<ProjectId>,
    /// Free-text search.
    pub search: Option<String>,
    /// Sort key.
    pub sort_by: Option<SortField>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

impl ListDescriptor {
    /// An unconstrained descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status filter.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority filter.
    #[must_use]
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the assignee filter.
    #[must_use]
    pub fn with_assignee(mut self, user: impl Into<UserId>) -> Self {
        self.assigned_to = Some(user.into());
        self
    }

    /// Set the project filter.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<ProjectId>) -> Self {
        self.project_id = Some(project.into());
        self
    }

    /// Set the free-text search.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set sort key and direction.
    #[must_use]
    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = Some(field);
        self.sort_order = Some(order);
        self
    }

    /// Set page number and page size.
    #[must_use]
    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Copy of this descriptor with blank strings and zero page values removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        fn present(s: Option<&str>) -> Option<String> {
            s.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
        }

        Self {
            status: self.status,
            priority: self.priority,
            assigned_to: present(self.assigned_to.as_deref()).map(UserId::from),
            project_id: present(self.project_id.as_deref()).map(ProjectId::from),
            search: present(self.search.as_deref()),
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            page: self.page.filter(|p| *p > 0),
            limit: self.limit.filter(|l| *l > 0),
        }
    }

    /// Query parameters for this descriptor, present fields only, in wire order.
    ///
    /// The `status` value is spelled according to `dialect`.
    pub fn query_pairs(&self, dialect: StatusDialect) -> Vec<(&'static str, String)> {
        let d = self.normalized();
        let mut pairs = Vec::new();
        if let Some(page) = d.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = d.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = d.search {
            pairs.push(("search", search));
        }
        if let Some(status) = d.status {
            pairs.push(("status", dialect.encode(status).to_string()));
        }
        if let Some(priority) = d.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(user) = d.assigned_to {
            pairs.push(("assignedTo", user.into_inner()));
        }
        if let Some(project) = d.project_id {
            pairs.push(("projectId", project.into_inner()));
        }
        if let Some(field) = d.sort_by {
            pairs.push(("sortBy", field.as_str().to_string()));
        }
        if let Some(order) = d.sort_order {
            pairs.push(("sortOrder", order.as_str().to_string()));
        }
        pairs
    }

    /// Stable serialization used to compare descriptors by value.
    ///
    /// Two descriptors that would send the same query share a key,
    /// regardless of how they were built.
    pub fn cache_key(&self) -> String {
        let pairs = self.query_pairs(StatusDialect::Standard);
        serde_json::to_string(&pairs).unwrap_or_default()
    }

    /// Whether `other` would produce the same fetch.
    pub fn same_query(&self, other: &Self) -> bool {
        self.cache_key() == other.cache_key()
    }

    /// Whether any filter (not sort or page) is active.
    pub fn has_filters(&self) -> bool {
        let d = self.normalized();
        d.status.is_some()
            || d.priority.is_some()
            || d.assigned_to.is_some()
            || d.project_id.is_some()
            || d.search.is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

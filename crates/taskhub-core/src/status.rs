//! Task status and priority vocabulary.
//!
//! The backend and older clients disagree on task-status spellings
//! (`in_progress`/`completed` vs `in-progress`/`done`). [`TaskStatus`] is the
//! single canonical enumeration used everywhere inside the client:
//!
//! | canonical    | accepted on input                 | `standard` output | `legacy` output |
//! |--------------|-----------------------------------|-------------------|-----------------|
//! | `Todo`       | `todo`                            | `todo`            | `todo`          |
//! | `InProgress` | `in_progress`, `in-progress`      | `in_progress`     | `in-progress`   |
//! | `Completed`  | `completed`, `done`               | `completed`       | `done`          |
//! | `Cancelled`  | `cancelled`, `canceled`           | `cancelled`       | `cancelled`     |
//!
//! Decoding always accepts every spelling. What goes back over the wire is
//! chosen by the configured [`StatusDialect`], applied at the gateway
//! boundary (request bodies and the `status` query parameter).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task status in the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Currently being worked on.
    #[serde(alias = "in-progress")]
    InProgress,
    /// Done.
    #[serde(alias = "done")]
    Completed,
    /// Abandoned.
    #[serde(alias = "canceled")]
    Cancelled,
}

impl TaskStatus {
    /// All statuses in workflow order.
    pub const ALL: [Self; 4] = [Self::Todo, Self::InProgress, Self::Completed, Self::Cancelled];

    /// Whether this status represents a terminal (done) state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Canonical string form (the `standard` dialect).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        StatusDialect::Standard.encode(self)
    }

    /// The status a "toggle done" control moves to.
    ///
    /// Open tasks become `Completed`; completed tasks reopen as `InProgress`.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::InProgress,
            _ => Self::Completed,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(Value::String(s.trim().to_lowercase()))
            .map_err(|_| format!("unknown task status: {s}"))
    }
}

/// Outbound spelling of [`TaskStatus`] values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusDialect {
    /// `todo`, `in_progress`, `completed`, `cancelled`.
    #[default]
    Standard,
    /// `todo`, `in-progress`, `done`, `cancelled`.
    Legacy,
}

impl StatusDialect {
    /// Encode a status for the wire.
    #[must_use]
    pub fn encode(self, status: TaskStatus) -> &'static str {
        match (self, status) {
            (_, TaskStatus::Todo) => "todo",
            (Self::Standard, TaskStatus::InProgress) => "in_progress",
            (Self::Legacy, TaskStatus::InProgress) => "in-progress",
            (Self::Standard, TaskStatus::Completed) => "completed",
            (Self::Legacy, TaskStatus::Completed) => "done",
            (_, TaskStatus::Cancelled) => "cancelled",
        }
    }

    /// Rewrite the top-level `status` field of a JSON request body into this dialect.
    ///
    /// Bodies without a recognizable status are left untouched.
    pub fn rewrite_body(self, body: &mut Value) {
        let Some(obj) = body.as_object_mut() else {
            return;
        };
        let Some(current) = obj.get("status") else {
            return;
        };
        if let Ok(status) = serde_json::from_value::<TaskStatus>(current.clone()) {
            let _ = obj.insert(
                "status".to_string(),
                Value::String(self.encode(status).to_string()),
            );
        }
    }
}

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Default priority.
    #[default]
    Medium,
    /// Elevated priority.
    High,
}

impl TaskPriority {
    /// Wire string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("unknown task priority: {s}")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

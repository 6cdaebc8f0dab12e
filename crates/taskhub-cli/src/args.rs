//! Command-line argument types.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use taskhub_core::{
    ListDescriptor, ProjectStatus, SortField, SortOrder, TaskPriority, TaskStatus,
};

/// TaskHub command-line client.
#[derive(Parser, Debug)]
#[command(name = "taskhub", about = "Manage TaskHub projects and tasks", version)]
pub struct Cli {
    /// Backend base URL (overrides settings).
    #[arg(long, global = true, env = "TASKHUB_API_URL")]
    pub api_url: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long, env = "TASKHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in.
    Signup {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long, env = "TASKHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Project commands.
    #[command(subcommand)]
    Projects(ProjectCommand),
    /// Task commands.
    #[command(subcommand)]
    Tasks(TaskCommand),
}

/// `taskhub projects ...`
#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List projects.
    List(ListArgs),
    /// Show one project with its members.
    Show {
        /// Project ID.
        id: String,
    },
    /// Create a project.
    Create {
        /// Project name.
        #[arg(long)]
        name: String,
        /// Project description.
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a project.
    Update {
        /// Project ID.
        id: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
        /// New status (planning, active, on-hold, completed, archived).
        #[arg(long)]
        status: Option<ProjectStatus>,
    },
    /// Delete a project.
    Delete {
        /// Project ID.
        id: String,
    },
    /// Manage project members.
    #[command(subcommand)]
    Members(MemberCommand),
    /// Show a project's activity feed.
    Activity {
        /// Project ID.
        id: String,
        /// Page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Entries per page (defaults to settings).
        #[arg(long)]
        limit: Option<u32>,
    },
}

/// `taskhub projects members ...`
#[derive(Subcommand, Debug)]
pub enum MemberCommand {
    /// Invite a member by email.
    Add {
        /// Project ID.
        project: String,
        /// Member email.
        email: String,
    },
    /// Remove a member.
    Remove {
        /// Project ID.
        project: String,
        /// Member ID.
        member: String,
    },
}

/// `taskhub tasks ...`
#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// List tasks.
    List {
        #[command(flatten)]
        filters: ListArgs,
        /// Print per-status counts and completion.
        #[arg(long)]
        stats: bool,
    },
    /// Search as you type: each line read from stdin replaces the search
    /// text, and results print once typing pauses.
    Search {
        #[command(flatten)]
        filters: ListArgs,
    },
    /// Show one task.
    Show {
        /// Task ID.
        id: String,
    },
    /// Create a task.
    Create(TaskFields),
    /// Update a task.
    Update {
        /// Task ID.
        id: String,
        #[command(flatten)]
        fields: TaskUpdateFields,
    },
    /// Delete a task.
    Delete {
        /// Task ID.
        id: String,
    },
    /// Assign a task to a user.
    Assign {
        /// Task ID.
        id: String,
        /// User ID.
        user: String,
    },
    /// Change a task's status.
    Status {
        /// Task ID.
        id: String,
        /// New status (todo, in_progress, completed, cancelled).
        status: TaskStatus,
    },
}

/// Filter, sort and page flags shared by list commands.
#[derive(Args, Debug, Default, Clone)]
pub struct ListArgs {
    /// Only tasks with this status.
    #[arg(long)]
    pub status: Option<TaskStatus>,
    /// Only tasks with this priority.
    #[arg(long)]
    pub priority: Option<TaskPriority>,
    /// Only tasks assigned to this user ID.
    #[arg(long)]
    pub assigned_to: Option<String>,
    /// Only tasks of this project ID.
    #[arg(long)]
    pub project: Option<String>,
    /// Free-text search.
    #[arg(long)]
    pub search: Option<String>,
    /// Sort field (title, name, dueDate, priority, status, createdAt, updatedAt).
    #[arg(long)]
    pub sort_by: Option<SortField>,
    /// Sort order (asc, desc).
    #[arg(long)]
    pub order: Option<SortOrder>,
    /// Page number.
    #[arg(long)]
    pub page: Option<u32>,
    /// Page size.
    #[arg(long)]
    pub limit: Option<u32>,
}

impl ListArgs {
    /// The descriptor these flags describe.
    pub fn descriptor(&self) -> ListDescriptor {
        ListDescriptor {
            status: self.status,
            priority: self.priority,
            assigned_to: self.assigned_to.clone().map(Into::into),
            project_id: self.project.clone().map(Into::into),
            search: self.search.clone(),
            sort_by: self.sort_by,
            sort_order: self.order,
            page: self.page,
            limit: self.limit,
        }
        .normalized()
    }
}

/// Fields of a new task.
#[derive(Args, Debug, Clone)]
pub struct TaskFields {
    /// Title.
    #[arg(long)]
    pub title: String,
    /// Description.
    #[arg(long)]
    pub description: String,
    /// Due date (`YYYY-MM-DD` or RFC 3339).
    #[arg(long, value_parser = parse_due_date)]
    pub due: DateTime<Utc>,
    /// Priority (low, medium, high).
    #[arg(long)]
    pub priority: Option<TaskPriority>,
    /// Initial status.
    #[arg(long)]
    pub status: Option<TaskStatus>,
    /// Project ID.
    #[arg(long)]
    pub project: Option<String>,
    /// Assignee user ID.
    #[arg(long)]
    pub assign: Option<String>,
    /// Tag; repeat for several.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

/// Fields of a task update; only given flags are sent.
#[derive(Args, Debug, Clone, Default)]
pub struct TaskUpdateFields {
    /// New title.
    #[arg(long)]
    pub title: Option<String>,
    /// New description.
    #[arg(long)]
    pub description: Option<String>,
    /// New status.
    #[arg(long)]
    pub status: Option<TaskStatus>,
    /// New priority.
    #[arg(long)]
    pub priority: Option<TaskPriority>,
    /// New due date.
    #[arg(long, value_parser = parse_due_date)]
    pub due: Option<DateTime<Utc>>,
    /// New assignee user ID.
    #[arg(long)]
    pub assign: Option<String>,
    /// Replacement tags, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
}

/// Parse `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_due_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        bail!("due date is empty");
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid due date: {s}"))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_flags_build_descriptor() {
        let cli = Cli::parse_from([
            "taskhub", "tasks", "list", "--status", "in_progress", "--search", " homepage ",
            "--sort-by", "dueDate", "--order", "asc", "--page", "2", "--limit", "6",
        ]);
        let Command::Tasks(TaskCommand::List { filters, stats }) = cli.command else {
            panic!("expected tasks list");
        };
        assert!(!stats);
        let d = filters.descriptor();
        assert_eq!(d.status, Some(TaskStatus::InProgress));
        assert_eq!(d.search.as_deref(), Some("homepage"));
        assert_eq!(d.sort_by, Some(SortField::DueDate));
        assert_eq!(d.page, Some(2));
    }

    #[test]
    fn search_command_takes_list_flags() {
        let cli = Cli::parse_from(["taskhub", "tasks", "search", "--project", "p1"]);
        let Command::Tasks(TaskCommand::Search { filters }) = cli.command else {
            panic!("expected tasks search");
        };
        assert_eq!(
            filters.descriptor().project_id.map(|p| p.to_string()).as_deref(),
            Some("p1")
        );
    }

    #[test]
    fn status_command_parses_status() {
        let cli = Cli::parse_from(["taskhub", "tasks", "status", "42", "completed"]);
        assert_matches!(
            cli.command,
            Command::Tasks(TaskCommand::Status { ref id, status: TaskStatus::Completed }) if id == "42"
        );
    }

    #[test]
    fn due_dates() {
        let d = parse_due_date("2024-02-01").unwrap();
        assert_eq!(d.to_rfc3339(), "2024-02-01T00:00:00+00:00");
        let d = parse_due_date("2024-02-01T10:30:00+02:00").unwrap();
        assert_eq!(d.to_rfc3339(), "2024-02-01T08:30:00+00:00");
        assert!(parse_due_date("tomorrow").is_err());
        assert!(parse_due_date("").is_err());
    }

    #[test]
    fn update_tags_split_on_comma() {
        let cli = Cli::parse_from(["taskhub", "tasks", "update", "1", "--tags", "ui,web"]);
        let Command::Tasks(TaskCommand::Update { fields, .. }) = cli.command else {
            panic!("expected tasks update");
        };
        assert_eq!(fields.tags, Some(vec!["ui".to_string(), "web".to_string()]));
    }
}

//! Text and JSON output.

use anyhow::{Context, Result};
use serde::Serialize;
use taskhub_core::{Activity, MemberRole, Pagination, Project, ProjectStatus, Task, User};
use taskhub_sync::StatusCounts;

/// Print `value` as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{text}");
    Ok(())
}

fn project_status(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Planning => "planning",
        ProjectStatus::Active => "active",
        ProjectStatus::OnHold => "on-hold",
        ProjectStatus::Completed => "completed",
        ProjectStatus::Archived => "archived",
        ProjectStatus::Unknown => "unknown",
    }
}

fn member_role(role: MemberRole) -> &'static str {
    match role {
        MemberRole::Owner => "owner",
        MemberRole::Admin => "admin",
        MemberRole::Member => "member",
    }
}

fn assignee_name(task: &Task) -> Option<&str> {
    task.assignee
        .as_ref()
        .map(|a| a.name.as_str())
        .or_else(|| task.assigned_to.as_ref().and_then(|a| a.name()))
}

/// One-line task summary.
pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "{:<8} [{}] ({}) {}",
        task.id, task.status, task.priority, task.title
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", due.format("%Y-%m-%d")));
    }
    let assignee = assignee_name(task)
        .map(str::to_string)
        .or_else(|| task.assignee_id().map(ToString::to_string));
    if let Some(who) = assignee {
        line.push_str(&format!("  @{who}"));
    }
    line
}

/// Multi-line task view.
pub fn task_detail(task: &Task) -> String {
    let mut out = vec![
        format!("{}  {}", task.id, task.title),
        format!("status:    {}", task.status),
        format!("priority:  {}", task.priority),
    ];
    if let Some(project) = &task.project_id {
        out.push(format!("project:   {project}"));
    }
    if let Some(due) = task.due_date {
        out.push(format!("due:       {}", due.format("%Y-%m-%d")));
    }
    out.push(format!(
        "assignee:  {}",
        assignee_name(task).unwrap_or("Unassigned")
    ));
    if !task.tags.is_empty() {
        out.push(format!("tags:      {}", task.tags.join(", ")));
    }
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        out.push(String::new());
        out.push(description.to_string());
    }
    out.join("\n")
}

/// One-line project summary.
pub fn project_line(project: &Project) -> String {
    let mut line = format!(
        "{:<10} [{}] {}",
        project.id,
        project_status(project.status),
        project.name
    );
    if let (Some(done), Some(total)) = (project.completed_tasks, project.task_count) {
        line.push_str(&format!("  {done}/{total} tasks"));
    }
    line
}

/// Multi-line project view with members.
pub fn project_detail(project: &Project) -> String {
    let mut out = vec![project_line(project)];
    if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
        out.push(description.to_string());
    }
    if project.members.is_empty() {
        out.push("members:   none".to_string());
    } else {
        out.push("members:".to_string());
        for m in &project.members {
            out.push(format!("  {:<10} {} <{}> {}", m.id, m.name, m.email, member_role(m.role)));
        }
    }
    out.join("\n")
}

/// One-line activity entry.
pub fn activity_line(activity: &Activity) -> String {
    let when = activity
        .timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let who = activity.user.as_ref().map_or("someone", |u| u.name.as_str());
    let mut line = format!("{when:<16} {who} {}", activity.action);
    if let Some(name) = activity.entity_name.as_deref().or(activity.details.as_deref()) {
        line.push(' ');
        line.push_str(name);
    }
    line
}

/// Page position line.
pub fn pagination_line(p: &Pagination) -> String {
    format!(
        "Page {} of {} ({} items)",
        p.current_page, p.total_pages, p.total_items
    )
}

/// Status breakdown line.
pub fn stats_line(counts: &StatusCounts, progress: u8) -> String {
    format!(
        "todo {}  in progress {}  completed {}  cancelled {}  ({progress}% complete)",
        counts.todo, counts.in_progress, counts.completed, counts.cancelled
    )
}

/// Signed-in user line.
pub fn user_line(user: &User) -> String {
    format!("{} <{}> ({})", user.name, user.email, user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskhub_core::TaskStatus;

    #[test]
    fn task_line_shows_status_due_and_assignee() {
        let task: Task = serde_json::from_value(json!({
            "id": 7,
            "title": "Design Homepage Layout",
            "status": "in-progress",
            "priority": "high",
            "dueDate": "2024-02-01T00:00:00Z",
            "assignee": {"id": "u1", "name": "Sam"}
        }))
        .unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        let line = task_line(&task);
        assert!(line.contains("[in_progress]"));
        assert!(line.contains("(high)"));
        assert!(line.contains("due 2024-02-01"));
        assert!(line.ends_with("@Sam"));
    }

    #[test]
    fn task_detail_marks_unassigned() {
        let task = Task::new("t1", "Write docs");
        assert!(task_detail(&task).contains("assignee:  Unassigned"));
    }

    #[test]
    fn project_detail_lists_members() {
        let project: Project = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Website",
            "status": "on-hold",
            "members": [{"_id": "m1", "name": "Ana", "email": "ana@test.com", "role": "admin"}]
        }))
        .unwrap();
        let text = project_detail(&project);
        assert!(text.starts_with("p1"));
        assert!(text.contains("[on-hold]"));
        assert!(text.contains("Ana <ana@test.com> admin"));
    }

    #[test]
    fn stats_and_pages() {
        let counts = StatusCounts {
            todo: 1,
            in_progress: 2,
            completed: 1,
            cancelled: 0,
        };
        assert_eq!(
            stats_line(&counts, 25),
            "todo 1  in progress 2  completed 1  cancelled 0  (25% complete)"
        );
        assert_eq!(pagination_line(&Pagination::local(13, 2, 6)), "Page 2 of 3 (13 items)");
    }
}

//! `taskhub tasks ...`

use anyhow::{Result, bail};
use taskhub_client::ResourceGateway;
use taskhub_core::{Task, TaskDraft, TaskId, TaskPatch, UserId};
use taskhub_sync::{Collection, Phase, ResourceHandle, SearchDebouncer, Snapshot};
use tokio::io::BufReader;
use tracing::debug;

use super::{loaded, print_page, visible};
use crate::app::App;
use crate::args::{ListArgs, TaskCommand, TaskFields, TaskUpdateFields};
use crate::render;

pub(super) async fn run(app: &App, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::List { filters, stats } => list(app, &filters, stats).await,
        TaskCommand::Search { filters } => search(app, &filters).await,
        TaskCommand::Show { id } => show(app, id).await,
        TaskCommand::Create(fields) => {
            let task = app.api.tasks().create(&draft(fields)).await?;
            print_task(app, &task, "Created")
        }
        TaskCommand::Update { id, fields } => {
            let patch = patch(fields);
            if patch.is_empty() {
                bail!("Nothing to update: pass at least one field flag");
            }
            let task = handle(app, id).edit(&patch).await?;
            print_task(app, &task, "Updated")
        }
        TaskCommand::Delete { id } => {
            handle(app, id.clone()).remove().await?;
            if !app.json {
                println!("Deleted task {id}");
            }
            Ok(())
        }
        TaskCommand::Assign { id, user } => {
            let task = handle(app, id).assign(&UserId::from(user)).await?;
            print_task(app, &task, "Assigned")
        }
        TaskCommand::Status { id, status } => {
            let task = handle(app, id).set_status(status).await?;
            print_task(app, &task, "Updated")
        }
    }
}

fn handle(app: &App, id: String) -> ResourceHandle<taskhub_client::TasksGateway> {
    ResourceHandle::new(app.api.tasks(), Some(TaskId::from(id)))
}

async fn list(app: &App, args: &ListArgs, stats: bool) -> Result<()> {
    let tasks = Collection::with_descriptor(app.api.tasks(), args.descriptor());
    loaded(tasks.refetch().await)?;
    let snapshot = tasks.snapshot();
    let (items, pagination) = visible(&snapshot, args, app.page_size());
    print_page(app, items, &pagination, render::task_line, "No tasks found")?;
    if stats && !app.json {
        println!(
            "{}",
            render::stats_line(&snapshot.status_counts(), snapshot.progress_percent())
        );
    }
    Ok(())
}

async fn search(app: &App, args: &ListArgs) -> Result<()> {
    let tasks = Collection::with_descriptor(app.api.tasks(), args.descriptor());
    let debouncer = SearchDebouncer::new(tasks, app.settings.sync.search_debounce());
    if !app.json {
        eprintln!("Type a search and press enter; end input to stop.");
    }
    let input = BufReader::new(tokio::io::stdin());
    super::search::follow(&debouncer, input, |snapshot| print_results(app, args, snapshot)).await
}

fn print_results(app: &App, args: &ListArgs, snapshot: &Snapshot<Task>) -> Result<()> {
    if snapshot.phase == Phase::Failed {
        eprintln!("error: {}", snapshot.error.as_deref().unwrap_or("search failed"));
        return Ok(());
    }
    let (items, pagination) = visible(snapshot, args, app.page_size());
    print_page(app, items, &pagination, render::task_line, "No tasks found")
}

async fn show(app: &App, id: String) -> Result<()> {
    match handle(app, id.clone()).fetch().await? {
        Some(task) if app.json => render::print_json(&task),
        Some(task) => {
            println!("{}", render::task_detail(&task));
            Ok(())
        }
        None => bail!("Task {id} not found"),
    }
}

fn draft(fields: TaskFields) -> TaskDraft {
    let mut draft = TaskDraft {
        project_id: fields.project.map(Into::into),
        title: fields.title,
        description: Some(fields.description),
        status: fields.status,
        priority: fields.priority,
        due_date: Some(fields.due),
        assigned_to: fields.assign.map(Into::into),
        tags: Vec::new(),
    };
    for tag in &fields.tags {
        if !draft.add_tag(tag) {
            debug!(tag = %tag, "skipping blank or repeated tag");
        }
    }
    draft
}

fn patch(fields: TaskUpdateFields) -> TaskPatch {
    TaskPatch {
        title: fields.title,
        description: fields.description,
        status: fields.status,
        priority: fields.priority,
        due_date: fields.due,
        assigned_to: fields.assign.map(Into::into),
        tags: fields.tags,
    }
}

fn print_task(app: &App, task: &Task, verb: &str) -> Result<()> {
    if app.json {
        return render::print_json(task);
    }
    println!("{verb}:");
    println!("{}", render::task_detail(task));
    Ok(())
}

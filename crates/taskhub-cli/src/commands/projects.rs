//! `taskhub projects ...`

use anyhow::{Result, bail};
use taskhub_client::ResourceGateway;
use taskhub_core::{MemberId, Project, ProjectDraft, ProjectId, ProjectPatch};
use taskhub_sync::{ActivityFeed, Collection, ResourceHandle};

use super::{loaded, print_page, visible};
use crate::app::App;
use crate::args::{ListArgs, MemberCommand, ProjectCommand};
use crate::render;

pub(super) async fn run(app: &App, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::List(args) => list(app, &args).await,
        ProjectCommand::Show { id } => show(app, id).await,
        ProjectCommand::Create { name, description } => {
            let project = app
                .api
                .projects()
                .create(&ProjectDraft { name, description })
                .await?;
            print_project(app, &project, "Created")
        }
        ProjectCommand::Update {
            id,
            name,
            description,
            status,
        } => {
            let patch = ProjectPatch {
                name,
                description,
                status,
            };
            if patch.is_empty() {
                bail!("Nothing to update: pass --name, --description or --status");
            }
            let handle = ResourceHandle::new(app.api.projects(), Some(ProjectId::from(id)));
            let project = handle.edit(&patch).await?;
            print_project(app, &project, "Updated")
        }
        ProjectCommand::Delete { id } => {
            let handle = ResourceHandle::new(app.api.projects(), Some(ProjectId::from(id.as_str())));
            handle.remove().await?;
            if !app.json {
                println!("Deleted project {id}");
            }
            Ok(())
        }
        ProjectCommand::Members(cmd) => members(app, cmd).await,
        ProjectCommand::Activity { id, page, limit } => activity(app, id, page, limit).await,
    }
}

async fn list(app: &App, args: &ListArgs) -> Result<()> {
    let projects = Collection::with_descriptor(app.api.projects(), args.descriptor());
    loaded(projects.refetch().await)?;
    let snapshot = projects.snapshot();
    let (items, pagination) = visible(&snapshot, args, app.page_size());
    print_page(app, items, &pagination, render::project_line, "No projects found")
}

async fn show(app: &App, id: String) -> Result<()> {
    let handle = ResourceHandle::new(app.api.projects(), Some(ProjectId::from(id.as_str())));
    match handle.fetch().await? {
        Some(project) if app.json => render::print_json(&project),
        Some(project) => {
            println!("{}", render::project_detail(&project));
            Ok(())
        }
        None => bail!("Project {id} not found"),
    }
}

async fn members(app: &App, command: MemberCommand) -> Result<()> {
    let gateway = app.api.projects();
    let project = match command {
        MemberCommand::Add { project, email } => {
            gateway.add_member(&ProjectId::from(project), &email).await?
        }
        MemberCommand::Remove { project, member } => {
            gateway
                .remove_member(&ProjectId::from(project), &MemberId::from(member))
                .await?
        }
    };
    print_project(app, &project, "Members updated")
}

async fn activity(app: &App, id: String, page: u32, limit: Option<u32>) -> Result<()> {
    let size = limit.unwrap_or(app.settings.sync.activity_page_size);
    let feed = ActivityFeed::new(app.api.activity(), ProjectId::from(id), size);
    loaded(feed.load(page).await)?;
    let snapshot = feed.snapshot();
    let args = ListArgs {
        page: Some(page),
        limit: Some(size),
        ..ListArgs::default()
    };
    let (items, pagination) = visible(&snapshot, &args, size);
    print_page(app, items, &pagination, render::activity_line, "No activity yet")
}

fn print_project(app: &App, project: &Project, verb: &str) -> Result<()> {
    if app.json {
        return render::print_json(project);
    }
    println!("{verb}:");
    println!("{}", render::project_detail(project));
    Ok(())
}

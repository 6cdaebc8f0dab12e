//! Command handlers.

mod auth;
mod projects;
mod search;
mod tasks;

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use taskhub_client::ApiError;
use taskhub_core::Pagination;
use taskhub_sync::{FetchOutcome, Snapshot};

use crate::app::App;
use crate::args::{Command, ListArgs};
use crate::render;

/// Run one parsed command.
pub async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => auth::login(app, email, password).await,
        Command::Signup {
            name,
            email,
            password,
        } => auth::signup(app, name, email, password).await,
        Command::Logout => auth::logout(app).await,
        Command::Whoami => auth::whoami(app),
        Command::Projects(cmd) => projects::run(app, cmd).await,
        Command::Tasks(cmd) => tasks::run(app, cmd).await,
    }
}

/// Turn a fetch outcome into a command result.
fn loaded(outcome: FetchOutcome) -> Result<(), ApiError> {
    match outcome {
        FetchOutcome::Failed(err) => Err(err),
        FetchOutcome::Loaded { .. } | FetchOutcome::Unchanged | FetchOutcome::Stale => Ok(()),
    }
}

/// The page to show: the server's when it paginated, otherwise a local slice.
fn visible<'a, T>(
    snapshot: &'a Snapshot<T>,
    args: &ListArgs,
    page_size: u32,
) -> (&'a [T], Pagination) {
    match snapshot.pagination {
        Some(p) => (&snapshot.items, p),
        None => snapshot.visible_page(args.page.unwrap_or(1), args.limit.unwrap_or(page_size)),
    }
}

/// Print a list page as text lines or as JSON.
fn print_page<T: Serialize>(
    app: &App,
    items: &[T],
    pagination: &Pagination,
    line: impl Fn(&T) -> String,
    empty: &str,
) -> Result<()> {
    if app.json {
        return render::print_json(&json!({ "items": items, "pagination": pagination }));
    }
    if items.is_empty() {
        println!("{empty}");
        return Ok(());
    }
    for item in items {
        println!("{}", line(item));
    }
    if pagination.total_pages > 1 {
        println!("{}", render::pagination_line(pagination));
    }
    Ok(())
}

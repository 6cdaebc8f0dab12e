//! # taskhub-cli
//!
//! `taskhub` binary: signs in, then lists and edits projects and tasks
//! through the sync layer.

#![deny(unsafe_code)]

mod app;
mod args;
mod commands;
mod render;

use std::process::ExitCode;

use anyhow::Error;
use clap::Parser;
use taskhub_auth::AuthError;
use taskhub_client::ApiError;
use tracing::warn;

use crate::app::App;
use crate::args::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let Cli {
        api_url,
        json,
        command,
    } = Cli::parse();

    // Settings first: they carry the log level
    let loaded = taskhub_settings::load_settings();
    let mut settings = loaded.as_ref().ok().cloned().unwrap_or_default();
    let _ = taskhub_core::logging::init_subscriber_with_format(
        settings.logging.level.as_filter_str(),
        settings.logging.format,
    );
    if let Err(e) = &loaded {
        warn!(error = %e, "failed to load settings, using defaults");
    }
    if let Some(url) = api_url {
        settings.api.base_url = url;
    }

    let result = match App::build(settings, json) {
        Ok(app) => commands::run(&app, command).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Print `err` for a human; lost sessions get a hint to sign in again.
fn report(err: &Error) {
    eprintln!("error: {err:#}");
    if needs_login(err) {
        eprintln!("Run `taskhub login` to sign in again.");
    }
}

fn needs_login(err: &Error) -> bool {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        return api.is_unauthorized();
    }
    matches!(
        err.downcast_ref::<AuthError>(),
        Some(AuthError::NotAuthenticated | AuthError::SessionExpired(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_client::ApiErrorKind;

    #[test]
    fn expired_session_asks_for_login() {
        let err = Error::new(ApiError::new(
            ApiErrorKind::Unauthorized,
            "Session expired, please log in again",
            Some(401),
        ));
        assert!(needs_login(&err));
        assert!(needs_login(&Error::new(AuthError::NotAuthenticated)));
        assert!(!needs_login(&Error::new(ApiError::transport("Request timed out"))));
        assert!(!needs_login(&anyhow::anyhow!("Nothing to update")));
    }
}

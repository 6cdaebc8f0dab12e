//! `login`, `signup`, `logout`, `whoami`.

use anyhow::{Result, bail};
use taskhub_auth::Session;
use taskhub_core::{Credentials, SignupRequest};

use crate::app::App;
use crate::render;

pub(super) async fn login(app: &App, email: String, password: String) -> Result<()> {
    let session = app.auth.login(&Credentials { email, password }).await?;
    signed_in(app, &session)
}

pub(super) async fn signup(app: &App, name: String, email: String, password: String) -> Result<()> {
    let session = app
        .auth
        .signup(&SignupRequest {
            name,
            email,
            password,
        })
        .await?;
    signed_in(app, &session)
}

fn signed_in(app: &App, session: &Session) -> Result<()> {
    if app.json {
        return render::print_json(&session.user);
    }
    match &session.user {
        Some(user) => println!("Signed in as {}", render::user_line(user)),
        None => println!("Signed in"),
    }
    Ok(())
}

pub(super) async fn logout(app: &App) -> Result<()> {
    app.auth.logout().await;
    if !app.json {
        println!("Signed out");
    }
    Ok(())
}

pub(super) fn whoami(app: &App) -> Result<()> {
    if !app.auth.is_authenticated() {
        bail!("Not signed in. Run `taskhub login` first.");
    }
    let user = app.auth.current_user();
    if app.json {
        return render::print_json(&user);
    }
    match user {
        Some(user) => println!("{}", render::user_line(&user)),
        None => println!("Signed in (no user details stored)"),
    }
    Ok(())
}

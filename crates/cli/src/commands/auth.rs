//! Account commands: signup, login, logout, whoami.

use pepperleaf_client::api::types::SignupRequest;
use pepperleaf_client::{App, Result};

pub async fn signup(
    app: &App,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
) -> Result<()> {
    app.signup(SignupRequest {
        first_name,
        last_name,
        email,
        password,
    })
    .await?;
    Ok(())
}

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    app.login(email, password).await?;
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    app.logout();
    Ok(())
}

pub fn whoami(app: &App) -> Result<()> {
    match app.session().current_user() {
        Some(user) => println!("{} <{}>", user.display_name(), user.email),
        None => println!("not signed in"),
    }
    Ok(())
}

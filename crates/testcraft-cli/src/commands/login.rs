//! The `testcraft login` command.

use std::path::PathBuf;

use anyhow::Result;

use testcraft_auth::{AuthService, SESSION_STORAGE_KEY};
use testcraft_core::config::load_config_from;

pub fn execute(username: String, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let mut auth = AuthService::from_config(&config);

    let Some(login) = auth.login(&username, "") else {
        anyhow::bail!("unknown user: {username}");
    };

    println!("Logged in as {} ({})", login.user.name, login.user.username);
    println!("User ID: {}", login.user.id);
    println!("Session: {}", login.session.id);
    println!(
        "Expires: {}",
        login.session.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Store the session id under \"{SESSION_STORAGE_KEY}\".");

    Ok(())
}

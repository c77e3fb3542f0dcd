//! Handlers for `tradebook login` and `tradebook logout`.

use crate::commands::Out;
use crate::{Client, Config, Result, Session};
use anyhow::Context;

/// Exchanges the username and password for a credential pair and stores it.
pub async fn login(config: &Config, username: &str, password: &str) -> Result<Out<()>> {
    let client = Client::from_config(config).await?;
    client
        .login(username, password)
        .await
        .context("Login failed")?;
    Ok(Out::new_message(format!("Logged in as {username}")))
}

/// Clears the stored credential pair. The backend keeps no session state, so this is purely a
/// local operation.
pub async fn logout(config: &Config) -> Result<Out<()>> {
    Session::clear(&config.token_path()).await?;
    Ok(Out::new_message("Logged out; stored credentials cleared"))
}

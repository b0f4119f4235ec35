//! User administration from the terminal

use crate::config::Config;
use crate::db::repositories::user::generate_temporary_password;
use crate::state::SharedState;

use super::CLI_ACTOR;

pub async fn cmd_users_list(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let users = state.auth_service.list_users().await?;

    println!("Users ({} total)", users.len());
    println!("{:-<60}", "");

    for user in users {
        let role = if user.is_admin { "admin" } else { "user" };
        let pending = if user.must_change_password {
            " (password change pending)"
        } else {
            ""
        };
        println!("[{}] {} - {role}{pending}", user.id, user.username);
    }

    Ok(())
}

pub async fn cmd_users_add(
    config: &Config,
    username: &str,
    password: Option<String>,
    admin: bool,
) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let generated = password.is_none();
    let password = password.unwrap_or_else(generate_temporary_password);

    let user = state
        .auth_service
        .create_user(CLI_ACTOR, username, &password, admin)
        .await?;

    println!("✓ Created user '{}' (ID: {})", user.username, user.id);
    if generated {
        println!("  Temporary password: {password}");
    }
    println!("  The password must be changed on first login.");
    Ok(())
}

pub async fn cmd_users_remove(config: &Config, username: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let Some(user) = state.store.get_user_by_username(username).await? else {
        println!("User '{username}' not found.");
        return Ok(());
    };

    state.auth_service.delete_user(CLI_ACTOR, user.id).await?;
    println!("✓ Removed user '{username}'");
    Ok(())
}

pub async fn cmd_users_reset_password(config: &Config, username: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let Some(user) = state.store.get_user_by_username(username).await? else {
        println!("User '{username}' not found.");
        return Ok(());
    };

    let temporary = state.auth_service.reset_password(CLI_ACTOR, user.id).await?;
    println!("✓ Password reset for '{username}'");
    println!("  Temporary password: {temporary}");
    Ok(())
}

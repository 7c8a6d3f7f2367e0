//! Login, logout, and whoami command handlers

use crate::state::AppState;

pub async fn cmd_login(state: &AppState, username: &str, password: &str) -> anyhow::Result<()> {
    match state.auth.login(username, password).await {
        Ok(session) => {
            println!("Logged in as {} <{}>", session.user.display_name(), session.user.email);
        }
        Err(e) => {
            println!("Login failed: {e}");
        }
    }
    Ok(())
}

pub async fn cmd_logout(state: &AppState) -> anyhow::Result<()> {
    if state.sessions.is_authenticated().await {
        state.auth.logout().await;
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

pub async fn cmd_whoami(state: &AppState) -> anyhow::Result<()> {
    if state.auth.require_session().await.is_err() {
        println!("Not logged in. Run: forkful login <username> <password>");
        return Ok(());
    }

    match state.auth.me().await {
        Ok(user) => {
            println!("{} (id {})", user.display_name(), user.id);
            if !user.email.is_empty() {
                println!("  email: {}", user.email);
            }
            if !user.image.is_empty() {
                println!("  avatar: {}", user.image);
            }
        }
        Err(e) if e.is_unauthorized() => {
            println!("Session rejected by the server. Please log in again.");
        }
        Err(e) => {
            println!("Could not fetch profile: {e}");
            return Err(e.into());
        }
    }
    Ok(())
}

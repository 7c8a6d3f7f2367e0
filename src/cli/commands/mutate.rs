//! Create, edit, and delete command handlers. All three are gated on an
//! active session and leave retry decisions to the user.

use crate::error::ApiError;
use crate::models::{NewRecipe, RecipeChanges};
use crate::services::RecipeService;
use crate::state::AppState;

const LOGIN_HINT: &str = "Not logged in. Run: forkful login <username> <password>";

pub async fn cmd_add(state: &AppState, recipe: NewRecipe) -> anyhow::Result<()> {
    if state.auth.require_session().await.is_err() {
        println!("{LOGIN_HINT}");
        return Ok(());
    }

    match state.recipes.create(recipe).await {
        Ok(created) => {
            println!("Created \"{}\" with id {}.", created.name, created.id);
        }
        Err(ApiError::Validation(message)) => {
            println!("Invalid recipe: {message}");
        }
        Err(e) if e.is_unauthorized() => println!("{LOGIN_HINT}"),
        Err(e) => {
            println!("Create failed: {e}");
        }
    }
    Ok(())
}

pub async fn cmd_edit(state: &AppState, id: i64, changes: RecipeChanges) -> anyhow::Result<()> {
    if state.auth.require_session().await.is_err() {
        println!("{LOGIN_HINT}");
        return Ok(());
    }

    match state.recipes.update(id, changes).await {
        Ok(updated) => {
            println!("Updated \"{}\" (id {}).", updated.name, updated.id);
        }
        Err(ApiError::Validation(message)) => {
            println!("Invalid update: {message}");
        }
        Err(ApiError::Http { status: 404, .. }) => {
            println!("No recipe with id {id}.");
        }
        Err(e) if e.is_unauthorized() => println!("{LOGIN_HINT}"),
        Err(e) => {
            println!("Update failed: {e}");
        }
    }
    Ok(())
}

pub async fn cmd_remove(state: &AppState, id: i64) -> anyhow::Result<()> {
    if state.auth.require_session().await.is_err() {
        println!("{LOGIN_HINT}");
        return Ok(());
    }

    match state.recipes.delete(id).await {
        Ok(receipt) if receipt.deleted => {
            println!("Deleted recipe {}.", receipt.id);
        }
        Ok(receipt) => {
            println!("Server declined to delete recipe {}.", receipt.id);
        }
        Err(ApiError::Http { status: 404, .. }) => {
            println!("No recipe with id {id}.");
        }
        Err(e) if e.is_unauthorized() => println!("{LOGIN_HINT}"),
        Err(e) => {
            println!("Delete failed: {e}");
        }
    }
    Ok(())
}

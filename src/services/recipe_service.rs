//! Domain service for browsing and managing recipes.
//!
//! Reads resolve through the entity cache; mutations go straight to the
//! remote and invalidate the affected cache tags on success. Every
//! operation is fire-once: no automatic retry, the caller decides whether
//! to resubmit.

use async_trait::async_trait;

use crate::cache::ListParams;
use crate::error::ApiError;
use crate::models::{DeleteReceipt, NewRecipe, Recipe, RecipeChanges, RecipePage};

#[async_trait]
pub trait RecipeService: Send + Sync {
    /// One page of the catalog for the given (normalized) parameters.
    async fn list(&self, params: ListParams) -> Result<RecipePage, ApiError>;

    /// A single recipe by id.
    async fn get(&self, id: i64) -> Result<Recipe, ApiError>;

    /// Creates a recipe; the server assigns the id. On success the listing
    /// queries are invalidated so they refetch.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] before any network call when the
    /// payload fails local checks.
    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, ApiError>;

    /// Applies a partial update. On success both the recipe's own entry and
    /// the listing queries are invalidated (fields surfaced in lists may
    /// have changed).
    async fn update(&self, id: i64, changes: RecipeChanges) -> Result<Recipe, ApiError>;

    /// Deletes a recipe. On success both the recipe's own entry and the
    /// listing queries are invalidated.
    async fn delete(&self, id: i64) -> Result<DeleteReceipt, ApiError>;
}

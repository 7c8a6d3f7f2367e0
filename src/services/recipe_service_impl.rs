//! Cache-backed implementation of the `RecipeService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use crate::cache::{EntityCache, ListParams, QueryKey, Tag};
use crate::error::ApiError;
use crate::models::{DeleteReceipt, NewRecipe, Recipe, RecipeChanges, RecipePage};
use crate::services::RecipeService;
use crate::transport::Transport;

pub struct CachedRecipeService {
    cache: Arc<EntityCache>,
    transport: Arc<dyn Transport>,
}

impl CachedRecipeService {
    pub fn new(cache: Arc<EntityCache>, transport: Arc<dyn Transport>) -> Self {
        Self { cache, transport }
    }
}

#[async_trait]
impl RecipeService for CachedRecipeService {
    async fn list(&self, params: ListParams) -> Result<RecipePage, ApiError> {
        let key = QueryKey::RecipeList(params.normalized());
        self.cache.fetch(&key).await?.into_page()
    }

    async fn get(&self, id: i64) -> Result<Recipe, ApiError> {
        let key = QueryKey::Recipe(id);
        self.cache.fetch(&key).await?.into_recipe()
    }

    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, ApiError> {
        recipe.validate()?;

        let body = serde_json::to_value(&recipe)
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let value = self
            .transport
            .execute(Method::POST, "/recipes/add", Some(body))
            .await?;
        let created: Recipe =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;

        info!(id = created.id, name = %created.name, "Created recipe");
        self.cache.invalidate(Tag::RecipeList).await;
        Ok(created)
    }

    async fn update(&self, id: i64, changes: RecipeChanges) -> Result<Recipe, ApiError> {
        changes.validate()?;

        let body = serde_json::to_value(&changes)
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let value = self
            .transport
            .execute(Method::PUT, &format!("/recipes/{id}"), Some(body))
            .await?;
        let updated: Recipe =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;

        info!(id, "Updated recipe");
        self.cache.invalidate(Tag::Recipe(id)).await;
        self.cache.invalidate(Tag::RecipeList).await;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<DeleteReceipt, ApiError> {
        let value = self
            .transport
            .execute(Method::DELETE, &format!("/recipes/{id}"), None)
            .await?;
        let receipt: DeleteReceipt =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;

        info!(id, "Deleted recipe");
        self.cache.invalidate(Tag::Recipe(id)).await;
        self.cache.invalidate(Tag::RecipeList).await;
        Ok(receipt)
    }
}

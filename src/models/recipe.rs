use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Difficulty as served by the remote. The wire value is capitalized but the
/// API accepts either case, so decoding tolerates both.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "Easy", alias = "easy")]
    Easy,
    #[serde(rename = "Medium", alias = "medium")]
    Medium,
    #[serde(rename = "Hard", alias = "hard")]
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        };
        write!(f, "{s}")
    }
}

/// A recipe as held by the remote service. `id` is server-assigned and
/// immutable; `rating` and `review_count` are server-populated and never
/// client-settable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub cook_time_minutes: u32,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub calories_per_serving: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<Vec<String>>,
}

const fn default_servings() -> u32 {
    1
}

impl Recipe {
    #[must_use]
    pub const fn total_time_minutes(&self) -> u32 {
        self.prep_time_minutes + self.cook_time_minutes
    }
}

/// One page of the recipe listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipePage {
    pub recipes: Vec<Recipe>,
    pub total: u32,
    pub skip: u32,
    pub limit: u32,
}

/// Payload for creating a recipe. The server assigns the id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub cook_time_minutes: u32,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub calories_per_serving: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: String,
}

impl NewRecipe {
    /// Local pre-submission checks; nothing here reaches the network.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("Recipe name is required".to_string()));
        }
        if self.servings == 0 {
            return Err(ApiError::Validation(
                "Servings must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial update payload: only the fields set here are sent, the rest keep
/// their server-side values. The id is immutable and lives in the URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_per_serving: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl RecipeChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
            && self.prep_time_minutes.is_none()
            && self.cook_time_minutes.is_none()
            && self.servings.is_none()
            && self.difficulty.is_none()
            && self.cuisine.is_none()
            && self.calories_per_serving.is_none()
            && self.tags.is_none()
            && self.image.is_none()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Err(ApiError::Validation(
                "At least one field must change".to_string(),
            ));
        }
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(ApiError::Validation(
                "Recipe name cannot be empty".to_string(),
            ));
        }
        if self.servings == Some(0) {
            return Err(ApiError::Validation(
                "Servings must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response of the delete endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteReceipt {
    pub id: i64,
    #[serde(alias = "isDeleted")]
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_decodes_camel_case() {
        let body = r#"{
            "id": 42,
            "name": "Margherita Pizza",
            "ingredients": ["dough", "tomato", "mozzarella"],
            "instructions": ["stretch", "top", "bake"],
            "prepTimeMinutes": 20,
            "cookTimeMinutes": 15,
            "servings": 4,
            "difficulty": "Easy",
            "cuisine": "Italian",
            "caloriesPerServing": 300,
            "tags": ["Pizza", "Italian"],
            "image": "https://example.com/pizza.png",
            "rating": 4.6,
            "reviewCount": 98,
            "userId": 166,
            "mealType": ["Dinner"]
        }"#;

        let recipe: Recipe = serde_json::from_str(body).unwrap();
        assert_eq!(recipe.id, 42);
        assert_eq!(recipe.prep_time_minutes, 20);
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.total_time_minutes(), 35);
        assert_eq!(recipe.review_count, Some(98));
    }

    #[test]
    fn test_difficulty_accepts_either_case() {
        let lower: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        let upper: Difficulty = serde_json::from_str("\"Easy\"").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"Hard\"");
    }

    #[test]
    fn test_new_recipe_validation() {
        let mut recipe = NewRecipe {
            name: "Pho".to_string(),
            servings: 2,
            ..NewRecipe::default()
        };
        assert!(recipe.validate().is_ok());

        recipe.name = "   ".to_string();
        assert!(matches!(
            recipe.validate(),
            Err(ApiError::Validation(_))
        ));

        recipe.name = "Pho".to_string();
        recipe.servings = 0;
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn test_changes_serialize_only_set_fields() {
        let changes = RecipeChanges {
            name: Some("Renamed".to_string()),
            ..RecipeChanges::default()
        };
        let body = serde_json::to_value(&changes).unwrap();
        assert_eq!(body, serde_json::json!({ "name": "Renamed" }));
    }

    #[test]
    fn test_empty_changes_rejected() {
        let changes = RecipeChanges::default();
        assert!(changes.is_empty());
        assert!(changes.validate().is_err());
    }

    #[test]
    fn test_delete_receipt_accepts_is_deleted_alias() {
        let receipt: DeleteReceipt =
            serde_json::from_str(r#"{"id": 7, "isDeleted": true}"#).unwrap();
        assert!(receipt.deleted);
        assert_eq!(receipt.id, 7);
    }
}

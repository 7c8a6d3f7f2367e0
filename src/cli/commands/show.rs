//! Show one recipe in full

use crate::error::ApiError;
use crate::services::RecipeService;
use crate::state::AppState;

pub async fn cmd_show(state: &AppState, id: i64) -> anyhow::Result<()> {
    let recipe = match state.recipes.get(id).await {
        Ok(recipe) => recipe,
        Err(ApiError::Http { status: 404, .. }) => {
            println!("No recipe with id {id}.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{} (#{})", recipe.name, recipe.id);
    println!(
        "{} | {} | prep {} min | cook {} min | {} servings | {} kcal/serving",
        recipe.cuisine,
        recipe.difficulty,
        recipe.prep_time_minutes,
        recipe.cook_time_minutes,
        recipe.servings,
        recipe.calories_per_serving
    );

    if let Some(rating) = recipe.rating {
        let reviews = recipe.review_count.unwrap_or(0);
        println!("Rated {rating:.1}/5 from {reviews} reviews");
    }

    if !recipe.tags.is_empty() {
        println!("Tags: {}", recipe.tags.join(", "));
    }

    if !recipe.ingredients.is_empty() {
        println!();
        println!("Ingredients:");
        for ingredient in &recipe.ingredients {
            println!("  - {ingredient}");
        }
    }

    if !recipe.instructions.is_empty() {
        println!();
        println!("Instructions:");
        for (i, step) in recipe.instructions.iter().enumerate() {
            println!("  {}. {step}", i + 1);
        }
    }

    if !recipe.image.is_empty() {
        println!();
        println!("Image: {}", recipe.image);
    }

    Ok(())
}

//! List recipes command handler

use crate::cache::{ListParams, SortField, SortOrder};
use crate::services::RecipeService;
use crate::state::AppState;

pub async fn cmd_list(
    state: &AppState,
    search: Option<String>,
    page: u32,
    page_size: Option<u32>,
    sort: SortField,
    order: SortOrder,
) -> anyhow::Result<()> {
    let limit = page_size.unwrap_or(state.config.cache.page_size).max(1);
    let skip = page.saturating_sub(1).saturating_mul(limit);

    let params = ListParams {
        skip,
        limit,
        search,
        sort_by: sort,
        order,
    };

    let result = state.recipes.list(params).await?;

    if result.recipes.is_empty() {
        if result.total == 0 {
            println!("No recipes found.");
        } else {
            println!("Nothing on this page ({} total).", result.total);
        }
        return Ok(());
    }

    println!("Recipes ({} total)", result.total);
    println!("{:-<70}", "");

    for recipe in &result.recipes {
        let rating = recipe
            .rating
            .map_or_else(|| "unrated".to_string(), |r| format!("{r:.1}/5"));
        println!("#{:<6} {} [{}]", recipe.id, recipe.name, rating);
        println!(
            "  {} | {} | {} min | {} servings",
            recipe.cuisine,
            recipe.difficulty,
            recipe.total_time_minutes(),
            recipe.servings
        );
    }

    let total_pages = result.total.div_ceil(limit).max(1);
    let current = result.skip / limit + 1;
    println!();
    println!("Page {current} of {total_pages}");

    Ok(())
}

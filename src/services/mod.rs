pub mod recipe_service;
pub mod recipe_service_impl;

pub use recipe_service::RecipeService;
pub use recipe_service_impl::CachedRecipeService;

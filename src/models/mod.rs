pub mod recipe;
pub mod user;

pub use recipe::{DeleteReceipt, Difficulty, NewRecipe, Recipe, RecipeChanges, RecipePage};
pub use user::{Session, User};

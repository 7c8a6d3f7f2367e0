pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod transport;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
use models::{NewRecipe, RecipeChanges};
use state::AppState;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let state = AppState::new(config)?;

    match cli.command {
        Some(Commands::Login { username, password }) => {
            cli::commands::cmd_login(&state, &username, &password).await
        }
        Some(Commands::Logout) => cli::commands::cmd_logout(&state).await,
        Some(Commands::Whoami) => cli::commands::cmd_whoami(&state).await,
        Some(Commands::List {
            search,
            page,
            page_size,
            sort,
            order,
        }) => cli::commands::cmd_list(&state, search, page, page_size, sort, order).await,
        Some(Commands::Show { id }) => cli::commands::cmd_show(&state, id).await,
        Some(Commands::Add {
            name,
            cuisine,
            difficulty,
            prep_minutes,
            cook_minutes,
            servings,
            calories,
            ingredients,
            instructions,
            tags,
            image,
        }) => {
            let recipe = NewRecipe {
                name,
                ingredients,
                instructions,
                prep_time_minutes: prep_minutes,
                cook_time_minutes: cook_minutes,
                servings,
                difficulty,
                cuisine,
                calories_per_serving: calories,
                tags,
                image,
            };
            cli::commands::cmd_add(&state, recipe).await
        }
        Some(Commands::Edit {
            id,
            name,
            cuisine,
            difficulty,
            prep_minutes,
            cook_minutes,
            servings,
            calories,
            ingredients,
            instructions,
            tags,
            image,
        }) => {
            let changes = RecipeChanges {
                name,
                ingredients: non_empty(ingredients),
                instructions: non_empty(instructions),
                prep_time_minutes: prep_minutes,
                cook_time_minutes: cook_minutes,
                servings,
                difficulty,
                cuisine,
                calories_per_serving: calories,
                tags: non_empty(tags),
                image,
            };
            cli::commands::cmd_edit(&state, id, changes).await
        }
        Some(Commands::Remove { id }) => cli::commands::cmd_remove(&state, id).await,
        None => {
            print_help();
            Ok(())
        }
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values) }
}

fn print_help() {
    println!("Forkful - recipe catalog client");
    println!();
    println!("Usage: forkful <command>");
    println!();
    println!("Commands:");
    println!("  list [-s term] [-p page] [--sort field] [--order asc|desc]");
    println!("  show <id>");
    println!("  login <username> <password>");
    println!("  logout");
    println!("  whoami");
    println!("  add --name <name> [flags]       (requires login)");
    println!("  edit <id> [flags]               (requires login)");
    println!("  remove <id>                     (requires login)");
    println!();
    println!("Run 'forkful --help' for full flag documentation.");
}

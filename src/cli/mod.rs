//! CLI module - command-line front-end for Forkful
//!
//! The commands are the "UI surface" of the client: they consume the core
//! only through the session manager, the cache, and the recipe service.

pub mod commands;

use clap::{Parser, Subcommand};

use crate::cache::{SortField, SortOrder};
use crate::models::Difficulty;

/// Forkful - recipe catalog client
/// Browse, search, and manage recipes against the remote catalog
#[derive(Parser)]
#[command(name = "forkful")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and persist the session
    Login {
        username: String,
        password: String,
    },

    /// Log out and discard the persisted session
    Logout,

    /// Show the signed-in user
    #[command(alias = "me")]
    Whoami,

    /// List recipes with search, sort, and pagination
    #[command(alias = "ls", alias = "l")]
    List {
        /// Free-text search term
        #[arg(short, long)]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Items per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<u32>,

        #[arg(long, value_enum, default_value_t = SortField::Name)]
        sort: SortField,

        #[arg(long, value_enum, default_value_t = SortOrder::Asc)]
        order: SortOrder,
    },

    /// Show one recipe in full
    #[command(alias = "i")]
    Show {
        id: i64,
    },

    /// Create a recipe (requires login)
    #[command(alias = "a")]
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        cuisine: String,

        #[arg(long, value_enum, ignore_case = true, default_value_t = Difficulty::Easy)]
        difficulty: Difficulty,

        #[arg(long, default_value_t = 0)]
        prep_minutes: u32,

        #[arg(long, default_value_t = 0)]
        cook_minutes: u32,

        #[arg(long, default_value_t = 1)]
        servings: u32,

        #[arg(long, default_value_t = 0)]
        calories: u32,

        /// May be given multiple times, in order
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,

        /// May be given multiple times, in order
        #[arg(long = "instruction")]
        instructions: Vec<String>,

        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long, default_value = "")]
        image: String,
    },

    /// Update fields of a recipe (requires login)
    #[command(alias = "e")]
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        cuisine: Option<String>,

        #[arg(long, value_enum, ignore_case = true)]
        difficulty: Option<Difficulty>,

        #[arg(long)]
        prep_minutes: Option<u32>,

        #[arg(long)]
        cook_minutes: Option<u32>,

        #[arg(long)]
        servings: Option<u32>,

        #[arg(long)]
        calories: Option<u32>,

        #[arg(long = "ingredient")]
        ingredients: Vec<String>,

        #[arg(long = "instruction")]
        instructions: Vec<String>,

        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long)]
        image: Option<String>,
    },

    /// Delete a recipe (requires login)
    #[command(alias = "rm", alias = "r")]
    Remove {
        id: i64,
    },
}

// Command-line interface: server lifecycle plus an HTTP client for the API

pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::search::{ContainsTextFilter, ExactTextFilter, RecipeFilters};

#[derive(Parser, Debug)]
#[command(name = "favorite-recipes")]
#[command(about = "Favorite Recipes - store and search your recipes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the recipe server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Run database migrations
    Migrate,

    /// Search recipes on a running server
    Search(SearchArgs),

    /// Show a recipe by id
    Get {
        /// Recipe ID
        id: String,
    },

    /// Delete a recipe by id
    Delete {
        /// Recipe ID
        id: String,
    },

    /// Upload a recipe from a JSON file
    Import {
        /// JSON file containing the recipe
        file: String,

        /// Recipe ID (defaults to the file's id, or a new one)
        #[arg(long)]
        id: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Recipe name contains this text
    #[arg(long)]
    pub name: Option<String>,

    /// Exclude recipes whose name contains the text
    #[arg(long, requires = "name")]
    pub exclude_name: bool,

    /// Instructions contain this text
    #[arg(long)]
    pub instructions: Option<String>,

    /// Exclude recipes whose instructions contain the text
    #[arg(long, requires = "instructions")]
    pub exclude_instructions: bool,

    /// Recipe has an ingredient with exactly this name
    #[arg(long)]
    pub ingredient: Option<String>,

    /// Exclude recipes having the ingredient
    #[arg(long, requires = "ingredient")]
    pub exclude_ingredient: bool,

    /// Only vegetarian (true) or only non-vegetarian (false) recipes
    #[arg(long)]
    pub vegetarian: Option<bool>,

    /// Page number, starting at 0
    #[arg(long)]
    pub page: Option<u32>,

    /// Recipes per page
    #[arg(long)]
    pub page_size: Option<u32>,
}

impl SearchArgs {
    pub fn to_filters(&self) -> RecipeFilters {
        RecipeFilters {
            recipe_name: self.name.as_ref().map(|text| ContainsTextFilter {
                contains_text: text.clone(),
                reverse: self.exclude_name,
            }),
            instructions: self.instructions.as_ref().map(|text| ContainsTextFilter {
                contains_text: text.clone(),
                reverse: self.exclude_instructions,
            }),
            ingredient_name: self.ingredient.as_ref().map(|text| ExactTextFilter {
                exact_text: text.clone(),
                reverse: self.exclude_ingredient,
            }),
            vegetarian: self.vegetarian,
            page_number: self.page,
            page_size: self.page_size,
        }
    }
}

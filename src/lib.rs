pub mod config;
pub mod db;
pub mod error;

// Search core
pub mod search;
pub mod store;

pub mod service;

// HTTP surface
pub mod api;

pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use db::models::{Ingredient, Recipe};
pub use error::{Error, Result};
pub use service::RecipeService;

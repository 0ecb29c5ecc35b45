// Record stores the search and CRUD surface run against

pub mod memory;
pub mod sqlite;

pub use memory::MemoryRecipeStore;
pub use sqlite::SqliteRecipeStore;

use crate::db::models::Recipe;
use crate::error::Result;
use crate::search::predicate::{OrderBy, Predicate};
use std::future::Future;

/// Persistence contract for recipes.
///
/// A recipe owns its ingredients: saving replaces the whole ingredient set
/// and deleting a recipe deletes its ingredients in the same transaction.
pub trait RecipeStore: Send + Sync {
    /// Insert or replace a recipe
    fn save_recipe(&self, recipe: &Recipe) -> impl Future<Output = Result<()>> + Send;

    /// Returns `false` when no recipe had this id
    fn delete_recipe_by_id(&self, id: &str) -> impl Future<Output = Result<bool>> + Send;

    fn get_recipe_by_id(&self, id: &str) -> impl Future<Output = Result<Option<Recipe>>> + Send;

    /// Recipes matching every predicate, ordered, then `skip` and `limit` applied
    fn query(
        &self,
        predicates: &[Predicate],
        order_by: OrderBy,
        skip: u64,
        limit: u64,
    ) -> impl Future<Output = Result<Vec<Recipe>>> + Send;
}

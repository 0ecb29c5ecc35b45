use super::RecipeStore;
use crate::db::{self, models::Recipe, DbPool};
use crate::error::Result;
use crate::search::predicate::{OrderBy, Predicate};

/// SQLite-backed store; predicates become `WHERE` clauses
#[derive(Clone)]
pub struct SqliteRecipeStore {
    pool: DbPool,
}

impl SqliteRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl RecipeStore for SqliteRecipeStore {
    async fn save_recipe(&self, recipe: &Recipe) -> Result<()> {
        db::recipes::save_recipe(&self.pool, recipe).await
    }

    async fn delete_recipe_by_id(&self, id: &str) -> Result<bool> {
        db::recipes::delete_recipe(&self.pool, id).await
    }

    async fn get_recipe_by_id(&self, id: &str) -> Result<Option<Recipe>> {
        db::recipes::get_recipe(&self.pool, id).await
    }

    async fn query(
        &self,
        predicates: &[Predicate],
        order_by: OrderBy,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Recipe>> {
        db::recipes::query_recipes(&self.pool, predicates, order_by, skip, limit).await
    }
}

use tracing::{debug, info};

use crate::db::models::Recipe;
use crate::error::{Error, Result};
use crate::search::{self, RecipeFilters, RecipeSearchResponse, MAX_PAGE_SIZE};
use crate::store::RecipeStore;
use crate::utils::validation::{validate_filters, validate_recipe};

/// CRUD and search over a [`RecipeStore`]
#[derive(Clone)]
pub struct RecipeService<S> {
    store: S,
    max_page_size: u32,
}

impl<S: RecipeStore> RecipeService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save a recipe under `id`, replacing any recipe stored there
    pub async fn save(&self, id: &str, mut recipe: Recipe) -> Result<()> {
        if id.trim().is_empty() {
            return Err(Error::Validation("Recipe id must not be blank".to_string()));
        }
        recipe.id = id.to_string();
        recipe.fill_missing_ingredient_ids();
        validate_recipe(&recipe)?;

        self.store.save_recipe(&recipe).await?;
        info!(
            "Saved recipe {} with {} ingredients",
            recipe.id,
            recipe.ingredients.len()
        );
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Recipe> {
        debug!("Get recipe {}", id);
        self.store
            .get_recipe_by_id(id)
            .await?
            .ok_or_else(|| Error::RecipeNotFound(id.to_string()))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete_recipe_by_id(id).await? {
            return Err(Error::RecipeNotFound(id.to_string()));
        }
        info!("Deleted recipe {}", id);
        Ok(())
    }

    pub async fn search(&self, filters: Option<&RecipeFilters>) -> Result<RecipeSearchResponse> {
        if let Some(filters) = filters {
            validate_filters(filters, self.max_page_size)?;
        }
        debug!("Search request: {:?}", filters);

        let response = search::search(&self.store, filters).await?;
        debug!(
            "Search returned {} recipes (page {}, size {})",
            response.current_number_of_recipes, response.page_number, response.page_size
        );
        Ok(response)
    }
}

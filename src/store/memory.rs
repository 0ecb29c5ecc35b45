use super::RecipeStore;
use crate::db::models::Recipe;
use crate::error::{Error, Result};
use crate::search::predicate::{OrderBy, Predicate};
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

/// In-memory store; predicates are evaluated with [`Predicate::matches`].
/// Keyed by id, so iteration order is id order.
#[derive(Default)]
pub struct MemoryRecipeStore {
    recipes: RwLock<BTreeMap<String, Recipe>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.recipes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.recipes.read().await.is_empty()
    }

    /// Every ingredient currently held, across all recipes
    pub async fn ingredient_count(&self) -> usize {
        self.recipes
            .read()
            .await
            .values()
            .map(|r| r.ingredients.len())
            .sum()
    }
}

impl RecipeStore for MemoryRecipeStore {
    async fn save_recipe(&self, recipe: &Recipe) -> Result<()> {
        let mut recipe = recipe.clone();
        recipe.fill_missing_ingredient_ids();
        let mut recipes = self.recipes.write().await;

        // Ingredient ids are unique across every recipe; the recipe being
        // replaced gives its own ids up.
        let mut taken: HashSet<&str> = recipes
            .values()
            .filter(|other| other.id != recipe.id)
            .flat_map(|other| other.ingredients.iter().map(|i| i.id.as_str()))
            .collect();
        for ingredient in &recipe.ingredients {
            if !taken.insert(&ingredient.id) {
                return Err(Error::Validation(format!(
                    "Ingredient id {} is already in use",
                    ingredient.id
                )));
            }
        }

        recipes.insert(recipe.id.clone(), recipe);
        Ok(())
    }

    async fn delete_recipe_by_id(&self, id: &str) -> Result<bool> {
        Ok(self.recipes.write().await.remove(id).is_some())
    }

    async fn get_recipe_by_id(&self, id: &str) -> Result<Option<Recipe>> {
        Ok(self.recipes.read().await.get(id).cloned())
    }

    async fn query(
        &self,
        predicates: &[Predicate],
        order_by: OrderBy,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Recipe>> {
        let recipes = self.recipes.read().await;

        let mut matching: Vec<&Recipe> = recipes
            .values()
            .filter(|recipe| predicates.iter().all(|p| p.matches(recipe)))
            .collect();

        if order_by == OrderBy::Name {
            // Stable sort keeps id order among equal names
            matching.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }
}

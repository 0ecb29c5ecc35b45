// Validation of incoming recipes and search filters
use crate::db::models::Recipe;
use crate::error::{Error, Result};
use crate::search::RecipeFilters;
use tracing::debug;

pub const MAX_NAME_LENGTH: usize = 255;

fn validate_name(name: &str, what: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(format!("{what} is required")));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "{what} must be between 1 and {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a recipe before it is saved
pub fn validate_recipe(recipe: &Recipe) -> Result<()> {
    validate_name(&recipe.name, "Name")?;

    if recipe.instructions.trim().is_empty() {
        return Err(Error::Validation("Instructions are required".to_string()));
    }

    if recipe.ingredients.is_empty() {
        return Err(Error::Validation("Ingredients are required".to_string()));
    }

    for ingredient in &recipe.ingredients {
        validate_name(&ingredient.name, "Ingredient name")?;
    }

    Ok(())
}

/// Validate search filters against the configured page size limit
pub fn validate_filters(filters: &RecipeFilters, max_page_size: u32) -> Result<()> {
    if let Some(page_size) = filters.page_size {
        if page_size == 0 {
            return Err(Error::Validation("Min value for pageSize is 1".to_string()));
        }
        if page_size > max_page_size {
            debug!("Rejected pageSize {} (max {})", page_size, max_page_size);
            return Err(Error::Validation(format!(
                "Max value for pageSize is {max_page_size}"
            )));
        }
    }

    let texts = [
        filters.recipe_name.as_ref().map(|f| &f.contains_text),
        filters.instructions.as_ref().map(|f| &f.contains_text),
        filters.ingredient_name.as_ref().map(|f| &f.exact_text),
    ];
    if texts.into_iter().flatten().any(|text| text.trim().is_empty()) {
        return Err(Error::Validation("Filter text must not be blank".to_string()));
    }

    Ok(())
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::filters::RecipeFilters;
use super::predicate::{OrderBy, Predicate, TextField};
use crate::db::models::Recipe;
use crate::error::Result;
use crate::store::RecipeStore;

/// Result of the recipe search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSearchResponse {
    pub recipes: Vec<Recipe>,
    /// Page size used for the search
    pub page_size: u32,
    pub page_number: u32,
    /// When this equals `page_size` the next page may hold more recipes
    pub current_number_of_recipes: usize,
}

/// A filter request lowered to what a store executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    pub predicates: Vec<Predicate>,
    pub order_by: OrderBy,
    pub skip: u64,
    pub limit: u64,
    pub page_number: u32,
    pub page_size: u32,
}

impl SearchPlan {
    pub fn from_filters(filters: Option<&RecipeFilters>) -> Self {
        let default_filters = RecipeFilters::default();
        let filters = filters.unwrap_or(&default_filters);

        let mut predicates = Vec::new();

        if let Some(filter) = &filters.recipe_name {
            predicates.push(Predicate::TextContains {
                field: TextField::Name,
                text: filter.contains_text.clone(),
                negated: filter.reverse,
            });
        }

        if let Some(filter) = &filters.instructions {
            predicates.push(Predicate::TextContains {
                field: TextField::Instructions,
                text: filter.contains_text.clone(),
                negated: filter.reverse,
            });
        }

        if let Some(filter) = &filters.ingredient_name {
            predicates.push(Predicate::HasIngredient {
                name: filter.exact_text.clone(),
                negated: filter.reverse,
            });
        }

        if let Some(vegetarian) = filters.vegetarian {
            predicates.push(Predicate::Vegetarian(vegetarian));
        }

        let page_number = filters.effective_page_number();
        let page_size = filters.effective_page_size();

        Self {
            predicates,
            order_by: OrderBy::Id,
            skip: u64::from(page_number).saturating_mul(u64::from(page_size)),
            limit: u64::from(page_size),
            page_number,
            page_size,
        }
    }
}

/// Run a filtered, paginated search. `None` means no filters at all.
pub async fn search<S: RecipeStore>(
    store: &S,
    filters: Option<&RecipeFilters>,
) -> Result<RecipeSearchResponse> {
    let plan = SearchPlan::from_filters(filters);
    debug!(
        "Search plan: {} predicates, skip {}, limit {}",
        plan.predicates.len(),
        plan.skip,
        plan.limit
    );

    let recipes = store
        .query(&plan.predicates, plan.order_by, plan.skip, plan.limit)
        .await?;

    Ok(RecipeSearchResponse {
        current_number_of_recipes: recipes.len(),
        recipes,
        page_size: plan.page_size,
        page_number: plan.page_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{ContainsTextFilter, ExactTextFilter};

    #[test]
    fn test_no_filters_uses_defaults() {
        let plan = SearchPlan::from_filters(None);
        assert!(plan.predicates.is_empty());
        assert_eq!(plan.page_number, 0);
        assert_eq!(plan.page_size, 100);
        assert_eq!(plan.skip, 0);
        assert_eq!(plan.limit, 100);
        assert_eq!(plan.order_by, OrderBy::Id);
    }

    #[test]
    fn test_predicates_follow_filters() {
        let filters = RecipeFilters {
            recipe_name: Some(ContainsTextFilter::new("Pizza")),
            instructions: Some(ContainsTextFilter::new("oven").reversed()),
            ingredient_name: Some(ExactTextFilter::new("tuna").reversed()),
            vegetarian: Some(true),
            ..Default::default()
        };

        let plan = SearchPlan::from_filters(Some(&filters));
        assert_eq!(
            plan.predicates,
            vec![
                Predicate::TextContains {
                    field: TextField::Name,
                    text: "Pizza".to_string(),
                    negated: false,
                },
                Predicate::TextContains {
                    field: TextField::Instructions,
                    text: "oven".to_string(),
                    negated: true,
                },
                Predicate::HasIngredient {
                    name: "tuna".to_string(),
                    negated: true,
                },
                Predicate::Vegetarian(true),
            ]
        );
    }

    #[test]
    fn test_skip_uses_effective_page_size() {
        let filters = RecipeFilters {
            page_number: Some(3),
            ..Default::default()
        };
        let plan = SearchPlan::from_filters(Some(&filters));
        assert_eq!(plan.skip, 300);
        assert_eq!(plan.limit, 100);

        let filters = RecipeFilters {
            page_number: Some(2),
            page_size: Some(7),
            ..Default::default()
        };
        let plan = SearchPlan::from_filters(Some(&filters));
        assert_eq!(plan.skip, 14);
        assert_eq!(plan.limit, 7);
    }

    #[test]
    fn test_skip_does_not_overflow() {
        let filters = RecipeFilters {
            page_number: Some(u32::MAX),
            page_size: Some(100_000),
            ..Default::default()
        };
        let plan = SearchPlan::from_filters(Some(&filters));
        assert_eq!(plan.skip, u64::from(u32::MAX) * 100_000);
    }
}

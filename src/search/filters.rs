use serde::{Deserialize, Deserializer, Serialize};

use super::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

/// Filters to search recipes. Every field is optional; an absent field
/// places no constraint on the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFilters {
    /// Recipe name contains this text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_name: Option<ContainsTextFilter>,

    /// Recipe instructions contain this text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<ContainsTextFilter>,

    /// Recipe has an ingredient with exactly this name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient_name: Option<ExactTextFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegetarian: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl RecipeFilters {
    pub fn effective_page_number(&self) -> u32 {
        self.page_number.unwrap_or(DEFAULT_PAGE_NUMBER)
    }

    pub fn effective_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// `"reverse": null` reads as `false`
fn deserialize_reverse<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// Case-insensitive substring match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainsTextFilter {
    pub contains_text: String,
    /// Exclude matching recipes instead of keeping them
    #[serde(default, deserialize_with = "deserialize_reverse")]
    pub reverse: bool,
}

impl ContainsTextFilter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            contains_text: text.into(),
            reverse: false,
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

/// Case-insensitive full match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactTextFilter {
    pub exact_text: String,
    /// Exclude matching recipes instead of keeping them
    #[serde(default, deserialize_with = "deserialize_reverse")]
    pub reverse: bool,
}

impl ExactTextFilter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            exact_text: text.into(),
            reverse: false,
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_all_defaults() {
        let filters: RecipeFilters = serde_json::from_str("{}").unwrap();
        assert_eq!(filters, RecipeFilters::default());
        assert_eq!(filters.effective_page_number(), 0);
        assert_eq!(filters.effective_page_size(), 100);
    }

    #[test]
    fn test_wire_field_names() {
        let filters: RecipeFilters = serde_json::from_str(
            r#"{
                "recipeName": {"containsText": "Pizza"},
                "instructions": {"containsText": "oven", "reverse": true},
                "ingredientName": {"exactText": "tuna", "reverse": true},
                "vegetarian": false,
                "pageNumber": 2,
                "pageSize": 10
            }"#,
        )
        .unwrap();

        assert_eq!(filters.recipe_name, Some(ContainsTextFilter::new("Pizza")));
        assert_eq!(
            filters.instructions,
            Some(ContainsTextFilter::new("oven").reversed())
        );
        assert_eq!(
            filters.ingredient_name,
            Some(ExactTextFilter::new("tuna").reversed())
        );
        assert_eq!(filters.vegetarian, Some(false));
        assert_eq!(filters.effective_page_number(), 2);
        assert_eq!(filters.effective_page_size(), 10);
    }

    #[test]
    fn test_null_reverse_is_false() {
        let filters: RecipeFilters = serde_json::from_str(
            r#"{"recipeName": {"containsText": "Pizza", "reverse": null},
                "ingredientName": {"exactText": "tuna", "reverse": null}}"#,
        )
        .unwrap();
        assert_eq!(filters.recipe_name, Some(ContainsTextFilter::new("Pizza")));
        assert_eq!(filters.ingredient_name, Some(ExactTextFilter::new("tuna")));
    }

    #[test]
    fn test_negative_page_number_is_rejected() {
        let result = serde_json::from_str::<RecipeFilters>(r#"{"pageNumber": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let filters = RecipeFilters {
            vegetarian: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&filters).unwrap(),
            r#"{"vegetarian":true}"#
        );
    }
}

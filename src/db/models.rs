use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Opaque identifier for recipes and ingredients
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default = "generate_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub vegetarian: bool,
}

impl Recipe {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        ingredients: Vec<Ingredient>,
        vegetarian: bool,
    ) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            instructions: instructions.into(),
            ingredients,
            vegetarian,
        }
    }

    /// Give every ingredient with a blank id a generated one
    pub fn fill_missing_ingredient_ids(&mut self) {
        for ingredient in &mut self.ingredients {
            if ingredient.id.trim().is_empty() {
                ingredient.id = generate_id();
            }
        }
    }

    pub(crate) fn from_row(row: RecipeRow, ingredients: Vec<Ingredient>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            instructions: row.instructions,
            ingredients,
            vegetarian: row.vegetarian,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default = "generate_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Amount in grams
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: i32,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: i32) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            amount,
        }
    }
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            amount: row.amount,
        }
    }
}

/// A `null` id is treated like a missing one
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(generate_id))
}

/// Accepts `"amount": 500` as well as `"amount": "500"`
fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(i32),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid ingredient amount: {s:?}"))),
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: String,
    pub name: String,
    pub instructions: String,
    pub vegetarian: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct IngredientRow {
    pub id: String,
    pub recipe_id: String,
    pub name: String,
    pub amount: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_defaults_on_deserialize() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"name": "Salad", "instructions": "Mix.", "ingredients": [{"name": "Tomato", "amount": 500}]}"#,
        )
        .unwrap();

        assert!(!recipe.id.is_empty());
        assert!(!recipe.vegetarian);
        assert_eq!(recipe.ingredients.len(), 1);
        assert!(!recipe.ingredients[0].id.is_empty());
    }

    #[test]
    fn test_null_ids_are_generated() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"id": null, "name": "Salad", "ingredients": [{"id": null, "name": "Tomato", "amount": 1}]}"#,
        )
        .unwrap();
        assert!(!recipe.id.is_empty());
        assert!(!recipe.ingredients[0].id.is_empty());

        let ingredient: Ingredient =
            serde_json::from_str(r#"{"id": "tomato-1", "name": "Tomato"}"#).unwrap();
        assert_eq!(ingredient.id, "tomato-1");
    }

    #[test]
    fn test_amount_accepts_numeric_string() {
        let ingredient: Ingredient =
            serde_json::from_str(r#"{"name": "Onion", "amount": "500"}"#).unwrap();
        assert_eq!(ingredient.amount, 500);

        let result = serde_json::from_str::<Ingredient>(r#"{"name": "Onion", "amount": "lots"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Ingredient::new("Tomato", 100);
        let b = Ingredient::new("Tomato", 100);
        assert_ne!(a.id, b.id);
    }
}

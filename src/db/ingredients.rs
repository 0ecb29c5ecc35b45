use crate::db::{models::*, DbPool};
use crate::error::{Error, Result};
use crate::search::predicate::fold_case;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;

/// Bound parameters per `IN (...)` query, well under SQLite's variable limit
const ID_BATCH_SIZE: usize = 500;

/// Insert the ingredients of a recipe, keeping their order
pub async fn insert_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: &str,
    ingredients: &[Ingredient],
) -> Result<()> {
    for (position, ingredient) in ingredients.iter().enumerate() {
        let id = if ingredient.id.trim().is_empty() {
            generate_id()
        } else {
            ingredient.id.clone()
        };

        sqlx::query(
            r#"
            INSERT INTO ingredients (id, recipe_id, name, name_folded, amount, position)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(recipe_id)
        .bind(&ingredient.name)
        .bind(fold_case(&ingredient.name))
        .bind(ingredient.amount)
        .bind(position as i64)
        .execute(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Error::Validation(
                format!("Ingredient id {} is already in use", id),
            ),
            other => Error::Database(other),
        })?;
    }

    Ok(())
}

/// Remove all ingredients owned by a recipe
pub async fn delete_recipe_ingredients(conn: &mut SqliteConnection, recipe_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM ingredients WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Get ingredients for a recipe
pub async fn get_recipe_ingredients(pool: &DbPool, recipe_id: &str) -> Result<Vec<Ingredient>> {
    let rows = sqlx::query_as::<_, IngredientRow>(
        r#"
        SELECT id, recipe_id, name, amount
        FROM ingredients
        WHERE recipe_id = ?
        ORDER BY position
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Ingredient::from).collect())
}

/// Get ingredients for multiple recipes (batch loading to avoid N+1)
pub async fn get_ingredients_for_recipes(
    pool: &DbPool,
    recipe_ids: &[String],
) -> Result<HashMap<String, Vec<Ingredient>>> {
    let mut ingredients_map: HashMap<String, Vec<Ingredient>> = HashMap::new();

    for chunk in recipe_ids.chunks(ID_BATCH_SIZE) {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, recipe_id, name, amount FROM ingredients WHERE recipe_id IN (",
        );
        let mut separated = query.separated(", ");
        for id in chunk {
            separated.push_bind(id);
        }
        separated.push_unseparated(") ORDER BY recipe_id, position");

        let rows: Vec<IngredientRow> = query.build_query_as().fetch_all(pool).await?;

        for row in rows {
            ingredients_map
                .entry(row.recipe_id.clone())
                .or_default()
                .push(Ingredient::from(row));
        }
    }

    Ok(ingredients_map)
}

/// Count total ingredients
pub async fn count_ingredients(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredients")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_pool, recipes, run_migrations};

    #[tokio::test]
    async fn test_ingredients_keep_order() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let recipe = Recipe::new(
            "Salad",
            "Cut and mix.",
            vec![
                Ingredient::new("Tomato", 500),
                Ingredient::new("Cucumber", 100),
                Ingredient::new("Onion", 50),
            ],
            true,
        );
        recipes::save_recipe(&pool, &recipe).await.unwrap();

        let retrieved = get_recipe_ingredients(&pool, &recipe.id).await.unwrap();
        assert_eq!(retrieved, recipe.ingredients);
    }

    #[tokio::test]
    async fn test_batch_lookup_groups_by_recipe() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let salad = Recipe::new("Salad", "Mix.", vec![Ingredient::new("Tomato", 1)], true);
        let soup = Recipe::new(
            "Soup",
            "Boil.",
            vec![Ingredient::new("Water", 1), Ingredient::new("Salt", 1)],
            true,
        );
        recipes::save_recipe(&pool, &salad).await.unwrap();
        recipes::save_recipe(&pool, &soup).await.unwrap();

        let ids = vec![salad.id.clone(), soup.id.clone(), "missing".to_string()];
        let map = get_ingredients_for_recipes(&pool, &ids).await.unwrap();

        assert_eq!(map[&salad.id].len(), 1);
        assert_eq!(map[&soup.id].len(), 2);
        assert!(!map.contains_key("missing"));
    }

    #[tokio::test]
    async fn test_blank_ingredient_ids_are_assigned() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let mut egg = Ingredient::new("Egg", 120);
        egg.id = String::new();
        let recipe = Recipe::new("Omelette", "Fry.", vec![egg], true);
        recipes::save_recipe(&pool, &recipe).await.unwrap();

        let stored = get_recipe_ingredients(&pool, &recipe.id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(!stored[0].id.is_empty());
        assert_eq!(stored[0].name, "Egg");
    }

    #[tokio::test]
    async fn test_ingredient_id_cannot_be_shared() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let tomato = Ingredient::new("Tomato", 1);
        let salad = Recipe::new("Salad", "Mix.", vec![tomato.clone()], true);
        let sauce = Recipe::new("Sauce", "Simmer.", vec![tomato], true);

        recipes::save_recipe(&pool, &salad).await.unwrap();
        let result = recipes::save_recipe(&pool, &sauce).await;
        assert!(matches!(result, Err(Error::Validation(_))));

        // The failed save left nothing behind
        assert!(recipes::get_recipe(&pool, &sauce.id).await.unwrap().is_none());
        assert_eq!(count_ingredients(&pool).await.unwrap(), 1);
    }
}

use crate::db::{ingredients, models::*, DbPool};
use crate::error::Result;
use crate::search::predicate::{escape_like, fold_case, OrderBy, Predicate};
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

/// Create or replace a recipe together with its ingredients
pub async fn save_recipe(pool: &DbPool, recipe: &Recipe) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO recipes (id, name, name_folded, instructions, instructions_folded, vegetarian)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            name_folded = excluded.name_folded,
            instructions = excluded.instructions,
            instructions_folded = excluded.instructions_folded,
            vegetarian = excluded.vegetarian
        "#,
    )
    .bind(&recipe.id)
    .bind(&recipe.name)
    .bind(fold_case(&recipe.name))
    .bind(&recipe.instructions)
    .bind(fold_case(&recipe.instructions))
    .bind(recipe.vegetarian)
    .execute(&mut *tx)
    .await?;

    ingredients::delete_recipe_ingredients(&mut tx, &recipe.id).await?;
    ingredients::insert_ingredients(&mut tx, &recipe.id, &recipe.ingredients).await?;

    tx.commit().await?;
    Ok(())
}

/// Get recipe by ID with its ingredients
pub async fn get_recipe(pool: &DbPool, recipe_id: &str) -> Result<Option<Recipe>> {
    let row = sqlx::query_as::<_, RecipeRow>(
        "SELECT id, name, instructions, vegetarian FROM recipes WHERE id = ?",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let ingredients = ingredients::get_recipe_ingredients(pool, &row.id).await?;
            Ok(Some(Recipe::from_row(row, ingredients)))
        }
        None => Ok(None),
    }
}

/// Delete a recipe and the ingredients it owns. Returns whether it existed.
pub async fn delete_recipe(pool: &DbPool, recipe_id: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let removed_ingredients = ingredients::delete_recipe_ingredients(&mut tx, recipe_id).await?;
    let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let found = result.rows_affected() > 0;
    if found {
        debug!(
            "Deleted recipe {} with {} ingredients",
            recipe_id, removed_ingredients
        );
    }
    Ok(found)
}

/// Count all recipes
pub async fn count_all_recipes(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

fn push_predicate(query: &mut QueryBuilder<'_, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::TextContains {
            field,
            text,
            negated,
        } => {
            let pattern = format!("%{}%", escape_like(&fold_case(text)));
            query.push(format!("r.{} ", field.folded_column()));
            if *negated {
                query.push("NOT ");
            }
            query.push("LIKE ");
            query.push_bind(pattern);
            query.push(" ESCAPE '\\'");
        }
        Predicate::HasIngredient { name, negated } => {
            if *negated {
                query.push("NOT ");
            }
            query.push(
                "EXISTS (SELECT 1 FROM ingredients i WHERE i.recipe_id = r.id AND i.name_folded = ",
            );
            query.push_bind(fold_case(name));
            query.push(")");
        }
        Predicate::Vegetarian(vegetarian) => {
            query.push("r.vegetarian = ");
            query.push_bind(*vegetarian);
        }
    }
}

/// Build the page query for a conjunction of predicates
pub fn build_search_query(
    predicates: &[Predicate],
    order_by: OrderBy,
    skip: u64,
    limit: u64,
) -> QueryBuilder<'static, Sqlite> {
    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT r.id, r.name, r.instructions, r.vegetarian FROM recipes r");

    for (i, predicate) in predicates.iter().enumerate() {
        query.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(&mut query, predicate);
    }

    query.push(match order_by {
        OrderBy::Id => " ORDER BY r.id",
        OrderBy::Name => " ORDER BY r.name, r.id",
    });

    // SQLite integers are signed 64-bit
    query.push(" LIMIT ");
    query.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    query.push(" OFFSET ");
    query.push_bind(i64::try_from(skip).unwrap_or(i64::MAX));

    query
}

/// Execute a page query and attach ingredients to every returned recipe
pub async fn query_recipes(
    pool: &DbPool,
    predicates: &[Predicate],
    order_by: OrderBy,
    skip: u64,
    limit: u64,
) -> Result<Vec<Recipe>> {
    let mut query = build_search_query(predicates, order_by, skip, limit);
    debug!("Recipe search SQL: {}", query.sql());

    let rows: Vec<RecipeRow> = query.build_query_as().fetch_all(pool).await?;

    let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
    let mut ingredients_map = ingredients::get_ingredients_for_recipes(pool, &ids).await?;

    let recipes = rows
        .into_iter()
        .map(|row| {
            let ingredients = ingredients_map.remove(&row.id).unwrap_or_default();
            Recipe::from_row(row, ingredients)
        })
        .collect();

    Ok(recipes)
}

use crate::db::models::Recipe;
use crate::search::{RecipeFilters, RecipeSearchResponse};
use crate::{Error, Result};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

fn recipe_url(server_url: &str, id: &str) -> String {
    format!(
        "{}/recipe/{}",
        server_url.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}

/// Map error statuses to the crate's error kinds
async fn check_status(response: Response, recipe_id: Option<&str>) -> Result<Response> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = recipe_id {
            return Err(Error::RecipeNotFound(id.to_string()));
        }
    }

    if status == StatusCode::BAD_REQUEST {
        let body: ErrorBody = response.json().await?;
        return Err(Error::Validation(body.error));
    }

    Ok(response.error_for_status()?)
}

/// Run a search against the server
pub async fn fetch_search(server_url: &str, filters: &RecipeFilters) -> Result<RecipeSearchResponse> {
    let url = format!("{}/recipe/search", server_url.trim_end_matches('/'));
    debug!("POST {}", url);

    let response = Client::new().post(&url).json(filters).send().await?;
    let response = check_status(response, None).await?;

    Ok(response.json().await?)
}

/// Search for recipes and print them
pub async fn search(server_url: &str, filters: &RecipeFilters) -> Result<()> {
    let results = fetch_search(server_url, filters).await?;
    print_search_results(&results);
    Ok(())
}

/// Fetch a recipe by ID
pub async fn fetch_recipe(server_url: &str, id: &str) -> Result<Recipe> {
    let response = Client::new().get(recipe_url(server_url, id)).send().await?;
    let response = check_status(response, Some(id)).await?;

    Ok(response.json().await?)
}

/// Show a recipe by ID
pub async fn get(server_url: &str, id: &str) -> Result<()> {
    let recipe = fetch_recipe(server_url, id).await?;
    print_recipe(&recipe);
    Ok(())
}

/// Delete a recipe by ID
pub async fn delete(server_url: &str, id: &str) -> Result<()> {
    let response = Client::new()
        .delete(recipe_url(server_url, id))
        .send()
        .await?;
    check_status(response, Some(id)).await?;

    println!("✓ Deleted recipe {id}");
    Ok(())
}

/// Upload a recipe from a JSON file. Returns the id it was stored under.
pub async fn import(server_url: &str, file: &str, id: Option<String>) -> Result<String> {
    let path = Path::new(file);
    if !path.is_file() {
        return Err(Error::Validation(format!("File not found: {file}")));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let recipe: Recipe = serde_json::from_str(&content)?;
    let id = id.unwrap_or_else(|| recipe.id.clone());

    let response = Client::new()
        .put(recipe_url(server_url, &id))
        .json(&recipe)
        .send()
        .await?;
    check_status(response, None).await?;

    println!("✓ Imported: {}", recipe.name);
    println!("  ID: {id}");
    Ok(id)
}

fn print_recipe(recipe: &Recipe) {
    println!("{}", recipe.name);
    println!("  ID: {}", recipe.id);
    if recipe.vegetarian {
        println!("  Vegetarian");
    }
    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {} ({} g)", ingredient.name, ingredient.amount);
    }
    println!("\nInstructions:\n{}", recipe.instructions);
}

fn print_search_results(results: &RecipeSearchResponse) {
    if results.recipes.is_empty() {
        println!("No recipes found");
        return;
    }

    println!(
        "Page {} ({} recipes, page size {})\n",
        results.page_number, results.current_number_of_recipes, results.page_size
    );

    for recipe in &results.recipes {
        let ingredients: Vec<&str> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
        println!("{} [{}]", recipe.name, recipe.id);
        println!("  Ingredients: {}", ingredients.join(", "));
        if recipe.vegetarian {
            println!("  Vegetarian");
        }
    }

    if results.current_number_of_recipes as u64 == u64::from(results.page_size) {
        println!(
            "\nMore recipes may be available: --page {}",
            results.page_number.saturating_add(1)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ContainsTextFilter;

    #[test]
    fn test_recipe_url_encodes_id() {
        assert_eq!(
            recipe_url("http://localhost:8080/", "a b/c"),
            "http://localhost:8080/recipe/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn test_fetch_search_posts_filters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/recipe/search")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "recipeName": {"containsText": "Pizza", "reverse": false}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"recipes": [], "pageSize": 100, "pageNumber": 0, "currentNumberOfRecipes": 0}"#,
            )
            .create_async()
            .await;

        let filters = RecipeFilters {
            recipe_name: Some(ContainsTextFilter::new("Pizza")),
            ..Default::default()
        };
        let response = fetch_search(&server.url(), &filters).await.unwrap();

        assert_eq!(response.page_size, 100);
        assert_eq!(response.current_number_of_recipes, 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_recipe_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipe/missing")
            .with_status(404)
            .with_body(r#"{"error": "Recipe with id missing not found"}"#)
            .create_async()
            .await;

        let result = fetch_recipe(&server.url(), "missing").await;
        assert!(matches!(result, Err(Error::RecipeNotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_bad_request_carries_server_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/recipe/search")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Max value for pageSize is 100000"}"#)
            .create_async()
            .await;

        let result = fetch_search(&server.url(), &RecipeFilters::default()).await;
        assert!(
            matches!(result, Err(Error::Validation(msg)) if msg == "Max value for pageSize is 100000")
        );
    }

    #[tokio::test]
    async fn test_import_uses_explicit_id() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("salad.json");
        std::fs::write(
            &file,
            r#"{"name": "Salad", "instructions": "Mix.", "ingredients": [{"name": "Tomato", "amount": "500"}], "vegetarian": true}"#,
        )
        .unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/recipe/salad-1")
            .with_status(200)
            .create_async()
            .await;

        let id = import(
            &server.url(),
            file.to_str().unwrap(),
            Some("salad-1".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(id, "salad-1");
        mock.assert_async().await;
    }
}

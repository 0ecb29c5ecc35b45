use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::{
    api::models::*,
    db::{self, models::Recipe},
    search::{RecipeFilters, RecipeSearchResponse},
    service::RecipeService,
    store::SqliteRecipeStore,
    Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: db::DbPool,
    pub service: RecipeService<SqliteRecipeStore>,
    pub settings: crate::config::Settings,
}

impl AppState {
    pub fn new(pool: db::DbPool, settings: crate::config::Settings) -> Self {
        let service = RecipeService::new(SqliteRecipeStore::new(pool.clone()))
            .with_max_page_size(settings.pagination.max_page_size);
        Self {
            pool,
            service,
            settings,
        }
    }
}

/// Parse a JSON body ourselves so malformed input is a 400 with our error shape
fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

/// PUT /recipe/:id - Create or replace a recipe
pub async fn save_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode> {
    debug!("Save recipe request: {}", id);

    let recipe: Recipe = parse_body(&body)?;
    state.service.save(&id, recipe).await?;

    Ok(StatusCode::OK)
}

/// GET /recipe/:id - Get a recipe
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>> {
    debug!("Get recipe request: {}", id);

    let recipe = state.service.get(&id).await?;
    Ok(Json(recipe))
}

/// DELETE /recipe/:id - Delete a recipe and its ingredients
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    debug!("Delete recipe request: {}", id);

    state.service.delete(&id).await?;
    Ok(StatusCode::OK)
}

/// POST /recipe/search - Search recipes; an empty body means no filters
pub async fn search_recipes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RecipeSearchResponse>> {
    let filters: Option<RecipeFilters> = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        parse_body(&body)?
    };

    let response = state.service.search(filters.as_ref()).await?;
    Ok(Json(response))
}

/// GET /stats - Get record counts
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    debug!("Get stats request");

    let total_recipes = db::recipes::count_all_recipes(&state.pool).await?;
    let total_ingredients = db::ingredients::count_ingredients(&state.pool).await?;

    Ok(Json(Stats {
        total_recipes,
        total_ingredients,
    }))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    Ok(Json(ReadinessResponse {
        ready: db_healthy,
        database: if db_healthy { "ok" } else { "error" }.to_string(),
    }))
}

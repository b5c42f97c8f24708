//! Routes for the recipe store and the "similar recipes" rail.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::recipe::{CreateRecipe, Recipe};
use serde::Deserialize;
use services::services::{
    reviews::{RatingSummary, ReviewService},
    similarity::{DEFAULT_SIMILAR_LIMIT, ScoredCandidate, SimilarityService},
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Recipe>>>, ApiError> {
    let recipes = Recipe::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(recipes)))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateRecipe>,
) -> Result<ResponseJson<ApiResponse<Recipe>>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    let recipe = Recipe::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(recipe)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Recipe>>, ApiError> {
    let recipe = Recipe::find_by_id(&state.db().pool, recipe_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipe not found".to_string()))?;
    Ok(ResponseJson(ApiResponse::success(recipe)))
}

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub limit: Option<usize>,
}

/// Similar-recipes rail: the full recipe pool ranked against the reference.
/// An unknown reference yields an empty list, not a 404.
pub async fn similar_recipes(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Query(query): Query<SimilarQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<ScoredCandidate>>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_SIMILAR_LIMIT);
    let similar = SimilarityService::similar_recipes(&state.db().pool, recipe_id, limit).await?;
    Ok(ResponseJson(ApiResponse::success(similar)))
}

/// Persisted rating statistics for the ratings-display widget.
pub async fn get_rating_summary(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<RatingSummary>>, ApiError> {
    let summary = ReviewService::rating_summary(&state.db().pool, recipe_id).await?;
    Ok(ResponseJson(ApiResponse::success(summary)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/recipes",
        Router::new()
            .route("/", get(list_recipes).post(create_recipe))
            .route("/{recipe_id}", get(get_recipe))
            .route("/{recipe_id}/similar", get(similar_recipes))
            .route("/{recipe_id}/rating", get(get_rating_summary)),
    )
}

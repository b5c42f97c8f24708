//! Routes for per-recipe reviews and helpful-vote toggling.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::{
    review::{CreateReview, Review, UpdateReview},
    review_vote::VoteRequest,
};
use serde::Deserialize;
use services::services::reviews::{ListReviewsQuery, ReviewPage, ReviewService, VoteStatus};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Identity for requests that carry no body. The service rejects a missing
/// user_id as a validation error.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Query(query): Query<ListReviewsQuery>,
) -> Result<ResponseJson<ApiResponse<ReviewPage>>, ApiError> {
    let page = ReviewService::list(&state.db().pool, recipe_id, query).await?;
    Ok(ResponseJson(ApiResponse::success(page)))
}

pub async fn create_review(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateReview>,
) -> Result<ResponseJson<ApiResponse<Review>>, ApiError> {
    let review = ReviewService::create(&state.db().pool, recipe_id, payload).await?;
    Ok(ResponseJson(ApiResponse::success(review)))
}

pub async fn update_review(
    State(state): State<AppState>,
    Path((recipe_id, review_id)): Path<(Uuid, Uuid)>,
    axum::Json(payload): axum::Json<UpdateReview>,
) -> Result<ResponseJson<ApiResponse<Review>>, ApiError> {
    let review = ReviewService::update(&state.db().pool, recipe_id, review_id, payload).await?;
    Ok(ResponseJson(ApiResponse::success(review)))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path((recipe_id, review_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<UserQuery>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    ReviewService::delete(&state.db().pool, recipe_id, review_id, query.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn vote_on_review(
    State(state): State<AppState>,
    Path((recipe_id, review_id)): Path<(Uuid, Uuid)>,
    axum::Json(payload): axum::Json<VoteRequest>,
) -> Result<ResponseJson<ApiResponse<VoteStatus>>, ApiError> {
    let status = ReviewService::vote(&state.db().pool, recipe_id, review_id, payload).await?;
    Ok(ResponseJson(ApiResponse::success(status)))
}

pub async fn get_vote_status(
    State(state): State<AppState>,
    Path((recipe_id, review_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<UserQuery>,
) -> Result<ResponseJson<ApiResponse<VoteStatus>>, ApiError> {
    let status =
        ReviewService::vote_status(&state.db().pool, recipe_id, review_id, query.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(status)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/recipes/{recipe_id}/reviews",
        Router::new()
            .route("/", get(list_reviews).post(create_review))
            .route("/{review_id}", put(update_review).delete(delete_review))
            .route("/{review_id}/vote", get(get_vote_status).post(vote_on_review)),
    )
}

//! Review aggregation: CRUD on per-recipe reviews, helpful-vote toggling and
//! derived rating statistics.

use std::{collections::BTreeMap, str::FromStr};

use db::models::{
    rating_stats::{RecipeRatingStats, round_average},
    recipe::Recipe,
    review::{CreateReview, Review, ReviewSort, UpdateReview},
    review_vote::{ReviewVote, VoteRequest, VoteType},
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Query parameters accepted by the review listing endpoint.
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct ListReviewsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<ReviewSort>,
    /// Exact rating value ("1"-"5") or "all".
    pub filter_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: i64,
    pub rating_distribution: BTreeMap<i64, i64>,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total_reviews: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub pagination: Pagination,
    pub statistics: RatingSummary,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct VoteStatus {
    pub helpful_votes: i64,
    pub not_helpful_votes: i64,
    pub user_vote: Option<VoteType>,
}

impl From<RecipeRatingStats> for RatingSummary {
    fn from(stats: RecipeRatingStats) -> Self {
        let rating_distribution = BTreeMap::from([
            (1, stats.rating_1),
            (2, stats.rating_2),
            (3, stats.rating_3),
            (4, stats.rating_4),
            (5, stats.rating_5),
        ]);
        Self {
            average_rating: stats.average_rating,
            total_reviews: stats.total_reviews,
            rating_distribution,
        }
    }
}

/// Rating must arrive as a whole number in [1,5]. Accepting f64 at the wire
/// lets a "4.5" surface here as a validation error instead of a
/// deserialization failure.
fn validate_rating(raw: f64) -> Result<i64, ReviewError> {
    if raw.fract() == 0.0 && (1.0..=5.0).contains(&raw) {
        Ok(raw as i64)
    } else {
        Err(ReviewError::Validation(
            "rating must be an integer between 1 and 5".to_string(),
        ))
    }
}

fn require_user_id(user_id: Option<String>) -> Result<String, ReviewError> {
    user_id
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ReviewError::Validation("user_id is required".to_string()))
}

fn parse_rating_filter(filter_by: Option<&str>) -> Result<Option<i64>, ReviewError> {
    match filter_by {
        None | Some("all") => Ok(None),
        Some(raw) => match raw.parse::<i64>() {
            Ok(rating @ 1..=5) => Ok(Some(rating)),
            _ => Err(ReviewError::Validation(format!(
                "invalid rating filter: {raw}"
            ))),
        },
    }
}

fn summary_from_histogram(rows: &[(i64, i64)]) -> RatingSummary {
    let mut rating_distribution: BTreeMap<i64, i64> = (1..=5).map(|r| (r, 0)).collect();
    let mut total = 0i64;
    let mut sum = 0i64;
    for &(rating, count) in rows {
        rating_distribution.insert(rating, count);
        total += count;
        sum += rating * count;
    }
    let average_rating = round_average(sum, total);
    RatingSummary {
        average_rating,
        total_reviews: total,
        rating_distribution,
    }
}

/// Per-tally delta for a single vote of `vote_type`, scaled by `by` (+1/-1).
fn tally_delta(vote_type: VoteType, by: i64) -> (i64, i64) {
    match vote_type {
        VoteType::Helpful => (by, 0),
        VoteType::NotHelpful => (0, by),
    }
}

pub struct ReviewService;

impl ReviewService {
    /// One page of a recipe's reviews plus pagination and statistics over
    /// the filtered set.
    pub async fn list(
        pool: &SqlitePool,
        recipe_id: Uuid,
        query: ListReviewsQuery,
    ) -> Result<ReviewPage, ReviewError> {
        let rating_filter = parse_rating_filter(query.filter_by.as_deref())?;
        let sort = query.sort_by.unwrap_or_default();
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * page_size;

        let reviews =
            Review::list_for_recipe(pool, recipe_id, rating_filter, sort, page_size, offset)
                .await?;
        let histogram = Review::histogram_for_recipe(pool, recipe_id, rating_filter).await?;
        let statistics = summary_from_histogram(&histogram);

        let total_reviews = statistics.total_reviews;
        let total_pages = (total_reviews + page_size - 1) / page_size;

        Ok(ReviewPage {
            reviews,
            pagination: Pagination {
                page,
                page_size,
                total_reviews,
                total_pages,
            },
            statistics,
        })
    }

    pub async fn create(
        pool: &SqlitePool,
        recipe_id: Uuid,
        payload: CreateReview,
    ) -> Result<Review, ReviewError> {
        let rating = validate_rating(payload.rating.ok_or_else(|| {
            ReviewError::Validation("rating is required".to_string())
        })?)?;
        let comment = payload
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ReviewError::Validation("comment is required".to_string()))?
            .to_string();
        let user_id = require_user_id(payload.user_id)?;

        if !Recipe::exists(pool, recipe_id).await? {
            return Err(ReviewError::NotFound("recipe not found".to_string()));
        }
        if Review::find_by_recipe_and_user(pool, recipe_id, &user_id)
            .await?
            .is_some()
        {
            return Err(ReviewError::Conflict(
                "you have already reviewed this recipe".to_string(),
            ));
        }

        let user_name = payload
            .user_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Anonymous".to_string());

        let review = Review::create(
            pool,
            recipe_id,
            &user_id,
            &user_name,
            payload.user_avatar.as_deref(),
            rating,
            &comment,
        )
        .await
        .map_err(|e| match &e {
            // The unique index backs the pre-check under concurrent creates
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ReviewError::Conflict("you have already reviewed this recipe".to_string())
            }
            _ => ReviewError::Database(e),
        })?;

        RecipeRatingStats::recompute(pool, recipe_id).await?;
        info!(recipe_id = %recipe_id, review_id = %review.id, "review created");

        Ok(review)
    }

    pub async fn update(
        pool: &SqlitePool,
        recipe_id: Uuid,
        review_id: Uuid,
        payload: UpdateReview,
    ) -> Result<Review, ReviewError> {
        let user_id = require_user_id(payload.user_id)?;
        let rating = payload.rating.map(validate_rating).transpose()?;
        let comment = payload
            .comment
            .as_deref()
            .map(|c| {
                let trimmed = c.trim();
                if trimmed.is_empty() {
                    Err(ReviewError::Validation(
                        "comment cannot be empty".to_string(),
                    ))
                } else {
                    Ok(trimmed.to_string())
                }
            })
            .transpose()?;

        let existing = Review::find_by_recipe_and_id(pool, recipe_id, review_id)
            .await?
            .ok_or_else(|| ReviewError::NotFound("review not found".to_string()))?;
        if existing.user_id != user_id {
            return Err(ReviewError::Forbidden(
                "you can only edit your own reviews".to_string(),
            ));
        }

        let review = Review::update(pool, review_id, rating, comment.as_deref()).await?;
        RecipeRatingStats::recompute(pool, recipe_id).await?;
        info!(recipe_id = %recipe_id, review_id = %review_id, "review updated");

        Ok(review)
    }

    pub async fn delete(
        pool: &SqlitePool,
        recipe_id: Uuid,
        review_id: Uuid,
        user_id: Option<String>,
    ) -> Result<(), ReviewError> {
        let user_id = require_user_id(user_id)?;

        let existing = Review::find_by_recipe_and_id(pool, recipe_id, review_id)
            .await?
            .ok_or_else(|| ReviewError::NotFound("review not found".to_string()))?;
        if existing.user_id != user_id {
            return Err(ReviewError::Forbidden(
                "you can only delete your own reviews".to_string(),
            ));
        }

        Review::delete(pool, review_id).await?;
        RecipeRatingStats::recompute(pool, recipe_id).await?;
        info!(recipe_id = %recipe_id, review_id = %review_id, "review deleted");

        Ok(())
    }

    /// Toggle-vote on a review. The read-modify-write runs in one
    /// transaction so concurrent votes on the same review cannot lose
    /// tally updates.
    pub async fn vote(
        pool: &SqlitePool,
        recipe_id: Uuid,
        review_id: Uuid,
        payload: VoteRequest,
    ) -> Result<VoteStatus, ReviewError> {
        let user_id = require_user_id(payload.user_id)?;
        let raw_vote = payload
            .vote_type
            .ok_or_else(|| ReviewError::Validation("vote_type is required".to_string()))?;
        let vote = VoteType::from_str(&raw_vote)
            .map_err(|_| ReviewError::Validation(format!("invalid vote type: {raw_vote}")))?;

        let mut tx = pool.begin().await?;

        let review = Review::find_by_recipe_and_id(&mut *tx, recipe_id, review_id)
            .await?
            .ok_or_else(|| ReviewError::NotFound("review not found".to_string()))?;
        if review.user_id == user_id {
            return Err(ReviewError::Forbidden(
                "you cannot vote on your own review".to_string(),
            ));
        }

        let existing = ReviewVote::find(&mut *tx, review_id, &user_id).await?;
        let (helpful_delta, not_helpful_delta, user_vote) = match existing.map(|v| v.vote_type) {
            // Same vote again retracts it
            Some(previous) if previous == vote => {
                ReviewVote::delete(&mut *tx, review_id, &user_id).await?;
                let (h, n) = tally_delta(previous, -1);
                (h, n, None)
            }
            // Different vote swaps the tallies
            Some(previous) => {
                ReviewVote::upsert(&mut *tx, review_id, &user_id, vote).await?;
                let (ph, pn) = tally_delta(previous, -1);
                let (h, n) = tally_delta(vote, 1);
                (ph + h, pn + n, Some(vote))
            }
            None => {
                ReviewVote::upsert(&mut *tx, review_id, &user_id, vote).await?;
                let (h, n) = tally_delta(vote, 1);
                (h, n, Some(vote))
            }
        };

        let review =
            Review::adjust_votes(&mut *tx, review_id, helpful_delta, not_helpful_delta).await?;
        tx.commit().await?;

        debug!(
            review_id = %review_id,
            helpful_votes = review.helpful_votes,
            not_helpful_votes = review.not_helpful_votes,
            "vote recorded"
        );

        Ok(VoteStatus {
            helpful_votes: review.helpful_votes,
            not_helpful_votes: review.not_helpful_votes,
            user_vote,
        })
    }

    /// Current tallies for a review plus the requesting user's vote, if any.
    pub async fn vote_status(
        pool: &SqlitePool,
        recipe_id: Uuid,
        review_id: Uuid,
        user_id: Option<String>,
    ) -> Result<VoteStatus, ReviewError> {
        let user_id = require_user_id(user_id)?;

        let review = Review::find_by_recipe_and_id(pool, recipe_id, review_id)
            .await?
            .ok_or_else(|| ReviewError::NotFound("review not found".to_string()))?;
        let vote = ReviewVote::find(pool, review_id, &user_id).await?;

        Ok(VoteStatus {
            helpful_votes: review.helpful_votes,
            not_helpful_votes: review.not_helpful_votes,
            user_vote: vote.map(|v| v.vote_type),
        })
    }

    /// Persisted rating statistics for a recipe (all-zero when it has no
    /// reviews yet).
    pub async fn rating_summary(
        pool: &SqlitePool,
        recipe_id: Uuid,
    ) -> Result<RatingSummary, ReviewError> {
        if !Recipe::exists(pool, recipe_id).await? {
            return Err(ReviewError::NotFound("recipe not found".to_string()));
        }
        let stats = RecipeRatingStats::find_by_recipe_id(pool, recipe_id).await?;
        Ok(stats
            .map(RatingSummary::from)
            .unwrap_or_else(|| summary_from_histogram(&[])))
    }
}

#[cfg(test)]
mod tests {
    use db::{
        DBService,
        models::recipe::{CreateRecipe, Recipe},
    };

    use super::*;

    async fn test_pool() -> SqlitePool {
        DBService::new_in_memory().await.unwrap().pool
    }

    async fn seed_recipe(pool: &SqlitePool) -> Recipe {
        Recipe::create(
            pool,
            &CreateRecipe {
                title: "Tomato Soup".to_string(),
                ingredients: vec!["tomato".to_string(), "salt".to_string()],
            },
        )
        .await
        .unwrap()
    }

    fn review_payload(user_id: &str, rating: f64, comment: &str) -> CreateReview {
        CreateReview {
            rating: Some(rating),
            comment: Some(comment.to_string()),
            user_id: Some(user_id.to_string()),
            user_name: None,
            user_avatar: None,
        }
    }

    #[tokio::test]
    async fn create_trims_comment_and_defaults_attribution() {
        let pool = test_pool().await;
        let recipe = seed_recipe(&pool).await;

        let review = ReviewService::create(
            &pool,
            recipe.id,
            review_payload("alice", 5.0, "  great soup  "),
        )
        .await
        .unwrap();

        assert_eq!(review.comment, "great soup");
        assert_eq!(review.user_name, "Anonymous");
        assert_eq!(review.rating, 5);
        assert_eq!(review.helpful_votes, 0);
        assert_eq!(review.not_helpful_votes, 0);
    }

    #[tokio::test]
    async fn create_rejects_invalid_payloads() {
        let pool = test_pool().await;
        let recipe = seed_recipe(&pool).await;

        let mut missing_rating = review_payload("alice", 5.0, "fine");
        missing_rating.rating = None;
        let err = ReviewService::create(&pool, recipe.id, missing_rating)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));

        let err = ReviewService::create(&pool, recipe.id, review_payload("alice", 6.0, "fine"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));

        let err = ReviewService::create(&pool, recipe.id, review_payload("alice", 4.5, "fine"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));

        let err = ReviewService::create(&pool, recipe.id, review_payload("alice", 4.0, "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));

        let mut missing_user = review_payload("alice", 4.0, "fine");
        missing_user.user_id = None;
        let err = ReviewService::create(&pool, recipe.id, missing_user)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));
    }

    #[tokio::test]
    async fn create_for_unknown_recipe_is_not_found() {
        let pool = test_pool().await;

        let err = ReviewService::create(&pool, Uuid::new_v4(), review_payload("alice", 4.0, "ok"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::NotFound(_)));
    }

    #[tokio::test]
    async fn second_review_by_same_user_conflicts() {
        let pool = test_pool().await;
        let recipe = seed_recipe(&pool).await;

        ReviewService::create(&pool, recipe.id, review_payload("alice", 5.0, "first"))
            .await
            .unwrap();
        let err = ReviewService::create(&pool, recipe.id, review_payload("alice", 3.0, "second"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Conflict(_)));

        // A different user may still review
        ReviewService::create(&pool, recipe.id, review_payload("bob", 3.0, "fine"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_enforces_ownership_and_keeps_unset_fields() {
        let pool = test_pool().await;
        let recipe = seed_recipe(&pool).await;
        let review = ReviewService::create(&pool, recipe.id, review_payload("alice", 5.0, "tasty"))
            .await
            .unwrap();

        let err = ReviewService::update(
            &pool,
            recipe.id,
            review.id,
            UpdateReview {
                user_id: Some("mallory".to_string()),
                rating: Some(1.0),
                comment: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReviewError::Forbidden(_)));

        let err = ReviewService::update(
            &pool,
            recipe.id,
            Uuid::new_v4(),
            UpdateReview {
                user_id: Some("alice".to_string()),
                rating: Some(2.0),
                comment: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReviewError::NotFound(_)));

        let updated = ReviewService::update(
            &pool,
            recipe.id,
            review.id,
            UpdateReview {
                user_id: Some("alice".to_string()),
                rating: Some(3.0),
                comment: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.rating, 3);
        assert_eq!(updated.comment, "tasty");
    }

    #[tokio::test]
    async fn stats_track_review_mutations() {
        let pool = test_pool().await;
        let recipe = seed_recipe(&pool).await;

        let alice = ReviewService::create(&pool, recipe.id, review_payload("alice", 5.0, "great"))
            .await
            .unwrap();
        ReviewService::create(&pool, recipe.id, review_payload("bob", 4.0, "good"))
            .await
            .unwrap();

        let summary = ReviewService::rating_summary(&pool, recipe.id).await.unwrap();
        assert_eq!(summary.average_rating, 4.5);
        assert_eq!(summary.total_reviews, 2);
        assert_eq!(summary.rating_distribution[&5], 1);
        assert_eq!(summary.rating_distribution[&4], 1);
        assert_eq!(summary.rating_distribution[&1], 0);

        // 5,4,4 -> 4.333... rounds to one decimal
        ReviewService::create(&pool, recipe.id, review_payload("carol", 4.0, "good"))
            .await
            .unwrap();
        let summary = ReviewService::rating_summary(&pool, recipe.id).await.unwrap();
        assert_eq!(summary.average_rating, 4.3);
        assert_eq!(summary.total_reviews, 3);

        // Update recomputes too: 3,4,4 -> 3.666... -> 3.7
        ReviewService::update(
            &pool,
            recipe.id,
            alice.id,
            UpdateReview {
                user_id: Some("alice".to_string()),
                rating: Some(3.0),
                comment: None,
            },
        )
        .await
        .unwrap();
        let summary = ReviewService::rating_summary(&pool, recipe.id).await.unwrap();
        assert_eq!(summary.average_rating, 3.7);
        assert_eq!(summary.rating_distribution[&3], 1);
        assert_eq!(summary.rating_distribution[&5], 0);

        ReviewService::delete(&pool, recipe.id, alice.id, Some("alice".to_string()))
            .await
            .unwrap();

        let summary = ReviewService::rating_summary(&pool, recipe.id).await.unwrap();
        assert_eq!(summary.average_rating, 4.0);
        assert_eq!(summary.total_reviews, 2);
        assert_eq!(summary.rating_distribution[&3], 0);
    }

    #[tokio::test]
    async fn persisted_and_listed_averages_round_identically() {
        let pool = test_pool().await;
        let recipe = seed_recipe(&pool).await;

        // 5,4,4,4 -> 4.25, a midpoint mean where rounding modes diverge
        for (user, rating) in [("alice", 5.0), ("bob", 4.0), ("carol", 4.0), ("dave", 4.0)] {
            ReviewService::create(&pool, recipe.id, review_payload(user, rating, "review"))
                .await
                .unwrap();
        }

        let summary = ReviewService::rating_summary(&pool, recipe.id).await.unwrap();
        let page = ReviewService::list(&pool, recipe.id, ListReviewsQuery::default())
            .await
            .unwrap();
        assert_eq!(summary.average_rating, 4.3);
        assert_eq!(page.statistics.average_rating, summary.average_rating);
    }

    #[tokio::test]
    async fn list_paginates_sorts_and_filters() {
        let pool = test_pool().await;
        let recipe = seed_recipe(&pool).await;

        for (user, rating) in [("alice", 5.0), ("bob", 2.0), ("carol", 4.0)] {
            ReviewService::create(&pool, recipe.id, review_payload(user, rating, "review"))
                .await
                .unwrap();
        }

        let page = ReviewService::list(
            &pool,
            recipe.id,
            ListReviewsQuery {
                sort_by: Some(ReviewSort::Highest),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ratings: Vec<i64> = page.reviews.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![5, 4, 2]);
        assert_eq!(page.pagination.total_reviews, 3);
        assert_eq!(page.pagination.total_pages, 1);

        let page = ReviewService::list(
            &pool,
            recipe.id,
            ListReviewsQuery {
                page: Some(2),
                limit: Some(2),
                sort_by: Some(ReviewSort::Lowest),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.reviews.len(), 1);
        assert_eq!(page.reviews[0].rating, 5);
        assert_eq!(page.pagination.total_pages, 2);

        // Statistics cover the filtered set, not the whole recipe
        let page = ReviewService::list(
            &pool,
            recipe.id,
            ListReviewsQuery {
                filter_by: Some("5".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.reviews.len(), 1);
        assert_eq!(page.statistics.total_reviews, 1);
        assert_eq!(page.statistics.average_rating, 5.0);

        let err = ReviewService::list(
            &pool,
            recipe.id,
            ListReviewsQuery {
                filter_by: Some("9".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));
    }

    #[tokio::test]
    async fn most_helpful_sorts_by_net_votes() {
        let pool = test_pool().await;
        let recipe = seed_recipe(&pool).await;

        let first = ReviewService::create(&pool, recipe.id, review_payload("alice", 3.0, "a"))
            .await
            .unwrap();
        let second = ReviewService::create(&pool, recipe.id, review_payload("bob", 3.0, "b"))
            .await
            .unwrap();

        let vote = |user: &str, vote_type: &str| VoteRequest {
            user_id: Some(user.to_string()),
            vote_type: Some(vote_type.to_string()),
        };
        ReviewService::vote(&pool, recipe.id, second.id, vote("carol", "helpful"))
            .await
            .unwrap();
        ReviewService::vote(&pool, recipe.id, first.id, vote("carol", "notHelpful"))
            .await
            .unwrap();

        let page = ReviewService::list(
            &pool,
            recipe.id,
            ListReviewsQuery {
                sort_by: Some(ReviewSort::MostHelpful),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ids: Vec<Uuid> = page.reviews.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn vote_toggles_and_swaps() {
        let pool = test_pool().await;
        let recipe = seed_recipe(&pool).await;
        let review = ReviewService::create(&pool, recipe.id, review_payload("alice", 4.0, "nice"))
            .await
            .unwrap();

        let vote = |user: &str, vote_type: &str| VoteRequest {
            user_id: Some(user.to_string()),
            vote_type: Some(vote_type.to_string()),
        };

        // Author cannot vote on their own review
        let err = ReviewService::vote(&pool, recipe.id, review.id, vote("alice", "helpful"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Forbidden(_)));

        let err = ReviewService::vote(&pool, recipe.id, review.id, vote("bob", "sideways"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));

        let status = ReviewService::vote(&pool, recipe.id, review.id, vote("bob", "helpful"))
            .await
            .unwrap();
        assert_eq!(status.helpful_votes, 1);
        assert_eq!(status.not_helpful_votes, 0);
        assert_eq!(status.user_vote, Some(VoteType::Helpful));

        // Same vote again retracts it
        let status = ReviewService::vote(&pool, recipe.id, review.id, vote("bob", "helpful"))
            .await
            .unwrap();
        assert_eq!(status.helpful_votes, 0);
        assert_eq!(status.not_helpful_votes, 0);
        assert_eq!(status.user_vote, None);

        // Switching vote type swaps the tallies
        ReviewService::vote(&pool, recipe.id, review.id, vote("bob", "helpful"))
            .await
            .unwrap();
        let status = ReviewService::vote(&pool, recipe.id, review.id, vote("bob", "notHelpful"))
            .await
            .unwrap();
        assert_eq!(status.helpful_votes, 0);
        assert_eq!(status.not_helpful_votes, 1);
        assert_eq!(status.user_vote, Some(VoteType::NotHelpful));

        let status =
            ReviewService::vote_status(&pool, recipe.id, review.id, Some("bob".to_string()))
                .await
                .unwrap();
        assert_eq!(status.not_helpful_votes, 1);
        assert_eq!(status.user_vote, Some(VoteType::NotHelpful));

        let status =
            ReviewService::vote_status(&pool, recipe.id, review.id, Some("carol".to_string()))
                .await
                .unwrap();
        assert_eq!(status.user_vote, None);
    }
}

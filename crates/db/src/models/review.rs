use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Sort orders accepted by the review listing endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    Highest,
    Lowest,
    MostHelpful,
}

impl ReviewSort {
    /// ORDER BY clause for this sort. Secondary key keeps the order
    /// deterministic when the primary key ties.
    fn order_clause(self) -> &'static str {
        match self {
            ReviewSort::Newest => "created_at DESC",
            ReviewSort::Oldest => "created_at ASC",
            ReviewSort::Highest => "rating DESC, created_at DESC",
            ReviewSort::Lowest => "rating ASC, created_at DESC",
            ReviewSort::MostHelpful => "(helpful_votes - not_helpful_votes) DESC, created_at DESC",
        }
    }
}

/// A user's review of a recipe. At most one review exists per
/// (user_id, recipe_id) pair, backed by a unique index.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Review {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub rating: i64,
    pub comment: String,
    pub helpful_votes: i64,
    pub not_helpful_votes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for review creation. Everything is optional at the wire level so
/// the service can report missing fields as validation errors instead of
/// deserialization failures.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateReview {
    pub rating: Option<f64>,
    pub comment: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_avatar: Option<String>,
}

/// Payload for partial review updates.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateReview {
    pub user_id: Option<String>,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

impl Review {
    const COLUMNS: &'static str = "id, recipe_id, user_id, user_name, user_avatar, rating, \
         comment, helpful_votes, not_helpful_votes, created_at, updated_at";

    pub async fn find_by_recipe_and_id(
        executor: impl Executor<'_, Database = Sqlite>,
        recipe_id: Uuid,
        review_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {} FROM reviews WHERE recipe_id = $1 AND id = $2",
            Self::COLUMNS
        ))
        .bind(recipe_id)
        .bind(review_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_recipe_and_user(
        pool: &SqlitePool,
        recipe_id: Uuid,
        user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {} FROM reviews WHERE recipe_id = $1 AND user_id = $2",
            Self::COLUMNS
        ))
        .bind(recipe_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// One page of reviews for a recipe, optionally restricted to an exact
    /// rating value.
    pub async fn list_for_recipe(
        pool: &SqlitePool,
        recipe_id: Uuid,
        rating_filter: Option<i64>,
        sort: ReviewSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {} FROM reviews
             WHERE recipe_id = $1 AND ($2 IS NULL OR rating = $2)
             ORDER BY {}
             LIMIT $3 OFFSET $4",
            Self::COLUMNS,
            sort.order_clause()
        ))
        .bind(recipe_id)
        .bind(rating_filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Review counts per rating value over the (optionally filtered) set.
    pub async fn histogram_for_recipe(
        pool: &SqlitePool,
        recipe_id: Uuid,
        rating_filter: Option<i64>,
    ) -> Result<Vec<(i64, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT rating, COUNT(*) FROM reviews
             WHERE recipe_id = $1 AND ($2 IS NULL OR rating = $2)
             GROUP BY rating",
        )
        .bind(recipe_id)
        .bind(rating_filter)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        recipe_id: Uuid,
        user_id: &str,
        user_name: &str,
        user_avatar: Option<&str>,
        rating: i64,
        comment: &str,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO reviews (id, recipe_id, user_id, user_name, user_avatar, rating, comment)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            Self::COLUMNS
        ))
        .bind(id)
        .bind(recipe_id)
        .bind(user_id)
        .bind(user_name)
        .bind(user_avatar)
        .bind(rating)
        .bind(comment)
        .fetch_one(pool)
        .await
    }

    /// Partial update: a `None` field keeps its prior value. Always refreshes
    /// `updated_at`.
    pub async fn update(
        pool: &SqlitePool,
        review_id: Uuid,
        rating: Option<i64>,
        comment: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "UPDATE reviews SET
                rating = COALESCE($2, rating),
                comment = COALESCE($3, comment),
                updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {}",
            Self::COLUMNS
        ))
        .bind(review_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, review_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Apply deltas to the helpful/not-helpful tallies, flooring both at 0.
    pub async fn adjust_votes(
        executor: impl Executor<'_, Database = Sqlite>,
        review_id: Uuid,
        helpful_delta: i64,
        not_helpful_delta: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "UPDATE reviews SET
                helpful_votes = MAX(0, helpful_votes + $2),
                not_helpful_votes = MAX(0, not_helpful_votes + $3)
             WHERE id = $1
             RETURNING {}",
            Self::COLUMNS
        ))
        .bind(review_id)
        .bind(helpful_delta)
        .bind(not_helpful_delta)
        .fetch_one(executor)
        .await
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Mean of `sum` over `total` ratings, rounded to one decimal (0.0 when
/// empty). Every rating average in the system goes through this, so the
/// persisted stats and per-request statistics can never disagree on
/// rounding.
pub fn round_average(sum: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (sum as f64 / total as f64 * 10.0).round() / 10.0
    }
}

/// Derived per-recipe rating statistics, recomputed after every review
/// create/update/delete. Never mutated independently of the reviews table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct RecipeRatingStats {
    pub recipe_id: Uuid,
    pub average_rating: f64,
    pub total_reviews: i64,
    pub rating_1: i64,
    pub rating_2: i64,
    pub rating_3: i64,
    pub rating_4: i64,
    pub rating_5: i64,
    pub updated_at: DateTime<Utc>,
}

impl RecipeRatingStats {
    const COLUMNS: &'static str = "recipe_id, average_rating, total_reviews, \
         rating_1, rating_2, rating_3, rating_4, rating_5, updated_at";

    pub async fn find_by_recipe_id(
        pool: &SqlitePool,
        recipe_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {} FROM recipe_rating_stats WHERE recipe_id = $1",
            Self::COLUMNS
        ))
        .bind(recipe_id)
        .fetch_optional(pool)
        .await
    }

    /// Recompute the stats row for a recipe from its current reviews.
    /// Average is rounded via [`round_average`]; an empty review set yields
    /// an all-zero row.
    pub async fn recompute(pool: &SqlitePool, recipe_id: Uuid) -> Result<Self, sqlx::Error> {
        let histogram: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT rating, COUNT(*) FROM reviews WHERE recipe_id = $1 GROUP BY rating",
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await?;

        let mut counts = [0i64; 5];
        let mut total = 0i64;
        let mut sum = 0i64;
        for (rating, count) in histogram {
            if let Some(slot) = counts.get_mut((rating - 1) as usize) {
                *slot = count;
            }
            total += count;
            sum += rating * count;
        }
        let average_rating = round_average(sum, total);

        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO recipe_rating_stats
                (recipe_id, average_rating, total_reviews,
                 rating_1, rating_2, rating_3, rating_4, rating_5)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT(recipe_id) DO UPDATE SET
                average_rating = excluded.average_rating,
                total_reviews = excluded.total_reviews,
                rating_1 = excluded.rating_1,
                rating_2 = excluded.rating_2,
                rating_3 = excluded.rating_3,
                rating_4 = excluded.rating_4,
                rating_5 = excluded.rating_5,
                updated_at = datetime('now', 'subsec')
             RETURNING {}",
            Self::COLUMNS
        ))
        .bind(recipe_id)
        .bind(average_rating)
        .bind(total)
        .bind(counts[0])
        .bind(counts[1])
        .bind(counts[2])
        .bind(counts[3])
        .bind(counts[4])
        .fetch_one(pool)
        .await
    }
}

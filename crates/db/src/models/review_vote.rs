use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Helpfulness signal a user can attach to someone else's review.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize, TS, EnumString, Display,
)]
#[sqlx(type_name = "vote_type", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum VoteType {
    Helpful,
    NotHelpful,
}

/// A user's current vote on a review, keyed by (review_id, user_id).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ReviewVote {
    pub review_id: Uuid,
    pub user_id: String,
    pub vote_type: VoteType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for the vote endpoint. `vote_type` stays a raw string so unknown
/// values surface as validation errors rather than deserialization failures.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct VoteRequest {
    pub user_id: Option<String>,
    pub vote_type: Option<String>,
}

impl ReviewVote {
    const COLUMNS: &'static str = "review_id, user_id, vote_type, created_at, updated_at";

    pub async fn find(
        executor: impl Executor<'_, Database = Sqlite>,
        review_id: Uuid,
        user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {} FROM review_votes WHERE review_id = $1 AND user_id = $2",
            Self::COLUMNS
        ))
        .bind(review_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn upsert(
        executor: impl Executor<'_, Database = Sqlite>,
        review_id: Uuid,
        user_id: &str,
        vote_type: VoteType,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO review_votes (review_id, user_id, vote_type)
             VALUES ($1, $2, $3)
             ON CONFLICT(review_id, user_id) DO UPDATE SET
                vote_type = excluded.vote_type,
                updated_at = datetime('now', 'subsec')
             RETURNING {}",
            Self::COLUMNS
        ))
        .bind(review_id)
        .bind(user_id)
        .bind(vote_type)
        .fetch_one(executor)
        .await
    }

    pub async fn delete(
        executor: impl Executor<'_, Database = Sqlite>,
        review_id: Uuid,
        user_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM review_votes WHERE review_id = $1 AND user_id = $2")
            .bind(review_id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

/// A recipe as seen by the similarity scorer: an id, a display title and a
/// (possibly empty) ingredient list. Recipes are created externally and are
/// read-only for the scorer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    #[sqlx(json)]
    pub ingredients: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateRecipe {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl Recipe {
    const COLUMNS: &'static str = "id, title, ingredients, created_at";

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {} FROM recipes WHERE id = $1",
            Self::COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {} FROM recipes ORDER BY created_at ASC",
            Self::COLUMNS
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn exists(
        executor: impl Executor<'_, Database = Sqlite>,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM recipes WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    pub async fn create(pool: &SqlitePool, data: &CreateRecipe) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO recipes (id, title, ingredients) VALUES ($1, $2, $3) RETURNING {}",
            Self::COLUMNS
        ))
        .bind(id)
        .bind(&data.title)
        .bind(Json(&data.ingredients))
        .fetch_one(pool)
        .await
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use services::services::reviews::ReviewError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Review(err) => match err {
                ReviewError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                ReviewError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                ReviewError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                ReviewError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                ReviewError::Database(db_err) => {
                    error!(error = %db_err, "database error while handling review request");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
            ApiError::Database(db_err) => {
                error!(error = %db_err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

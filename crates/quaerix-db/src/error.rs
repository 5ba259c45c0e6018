//! Storage error types.

use quaerix_common::ApiError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("invalid question graph: {0}")]
    InvalidGraph(String),

    #[error("could not allocate a unique question id")]
    IdAllocation,
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::InvalidGraph(message) => ApiError::Validation(message),
            DbError::NotFound(message) => ApiError::NotFound(message),
            other => ApiError::Internal(anyhow::Error::new(other)),
        }
    }
}

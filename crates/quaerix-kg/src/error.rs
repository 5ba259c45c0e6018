//! Knowledge-graph client error types.

use quaerix_common::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KgError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl From<KgError> for ApiError {
    fn from(err: KgError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

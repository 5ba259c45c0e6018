//! Queue error types.

use quaerix_common::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue is shutting down or its workers are gone.
    #[error("job queue unavailable: {0}")]
    Unavailable(String),
}

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

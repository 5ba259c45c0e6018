//! Web-facing error taxonomy.
//!
//! Every failure that crosses the HTTP boundary is converted into an
//! `ApiError`, which renders as a JSON `{"message": ...}` body with the
//! matching status code. Store and client crates convert their own error
//! enums into this type at the boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input: bad graph structure, unknown command, invalid id.
    #[error("{0}")]
    Validation(String),

    /// Caller is anonymous or lacks the required ownership/role.
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is authenticated but the route requires the admin role.
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The external knowledge-graph service failed or is unreachable.
    #[error("knowledge graph service error: {0}")]
    Upstream(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("unauthorized".to_string())
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden("admin role required".to_string())
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", entity, id))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)   => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_)    => StatusCode::FORBIDDEN,
            ApiError::NotFound(_)     => StatusCode::NOT_FOUND,
            ApiError::Upstream(_)     => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_)     => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details go to the log, not the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::validation("bad graph").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden().status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("question", "abc").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Upstream("timeout".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_names_the_entity() {
        let err = ApiError::not_found("answerset", 42);
        assert_eq!(err.to_string(), "answerset 42 not found");
    }
}

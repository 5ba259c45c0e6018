//! Landing, account, and new-question data endpoints.
//!
//! Each returns a timestamp plus the caller's authorization descriptor —
//! the data behind the corresponding frontend views.

use crate::auth::{AuthData, Identity};
use axum::{Extension, Json};
use chrono::Utc;
use quaerix_common::ApiResult;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PageData {
    pub timestamp: String,
    pub user: AuthData,
}

impl PageData {
    fn for_identity(identity: &Identity) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            user: identity.auth.clone(),
        }
    }
}

/// GET /landing/data
pub async fn landing_data(Extension(identity): Extension<Identity>) -> Json<PageData> {
    Json(PageData::for_identity(&identity))
}

/// GET /account/data — data for the current user; anonymous callers get 401.
pub async fn account_data(
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<PageData>> {
    identity.require_user()?;
    Ok(Json(PageData::for_identity(&identity)))
}

/// GET /q/new/data
pub async fn new_data(Extension(identity): Extension<Identity>) -> Json<PageData> {
    Json(PageData::for_identity(&identity))
}

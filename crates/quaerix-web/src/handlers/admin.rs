//! Admin listing endpoint.

use crate::auth::Identity;
use crate::handlers::questions::ApiQuestion;
use crate::state::SharedState;
use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use quaerix_common::ApiResult;
use quaerix_db::{AnswerSet, User};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AdminData {
    pub timestamp: String,
    pub users: Vec<User>,
    pub questions: Vec<ApiQuestion>,
    pub answersets: Vec<AnswerSet>,
}

/// GET /admin/data — full listing of users, questions, and answer sets.
/// 401 for anonymous callers, 403 for authenticated non-admins.
pub async fn admin_data(
    State(state): State<SharedState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<AdminData>> {
    identity.require_admin()?;

    let users = state.users.list().await?;
    let questions = state.questions.list().await?;
    let answersets = state.answers.list_answersets().await?;

    Ok(Json(AdminData {
        timestamp: Utc::now().to_rfc3339(),
        users,
        questions: questions.iter().map(ApiQuestion::from_row).collect(),
        answersets,
    }))
}

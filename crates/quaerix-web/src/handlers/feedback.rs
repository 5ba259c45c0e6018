//! Feedback submission.

use crate::auth::Identity;
use crate::state::SharedState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use quaerix_common::{ApiError, ApiResult};
use quaerix_db::NewFeedback;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub question_id: String,
    pub answer_id: i64,
    pub impact: Option<i64>,
    pub accuracy: Option<i64>,
    pub notes: Option<String>,
}

/// POST /a/feedback — record the caller's ratings for one (question, answer)
/// pair. Repeat submissions are allowed; each becomes its own row.
pub async fn feedback_submit(
    State(state): State<SharedState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<FeedbackRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = identity.require_user()?;

    state
        .questions
        .find_by_id(&body.question_id)
        .await?
        .ok_or_else(|| ApiError::not_found("question", &body.question_id))?;
    state
        .answers
        .find_answer_by_id(body.answer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("answer", body.answer_id))?;

    let feedback = state
        .feedback
        .create(&NewFeedback {
            user_id: user.id,
            question_id: body.question_id,
            answer_id: body.answer_id,
            impact: body.impact,
            accuracy: body.accuracy,
            notes: body.notes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(feedback)))
}

//! Answer set and answer detail endpoints. Read-only: answer rows are
//! written by the external answering job.

use crate::auth::Identity;
use crate::handlers::questions::ApiQuestion;
use crate::state::SharedState;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::Utc;
use quaerix_common::{ApiError, ApiResult};
use quaerix_db::{Answer, AnswerSet, Feedback};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct AnswersetData {
    pub timestamp: String,
    pub user: crate::auth::AuthData,
    pub answerset: AnswerSet,
    pub answers: Vec<Answer>,
    pub questions: Vec<ApiQuestion>,
    pub answerset_graph: Value,
}

#[derive(Debug, Serialize)]
pub struct AnswerData {
    pub timestamp: String,
    pub user: crate::auth::AuthData,
    pub answer: Answer,
    pub feedback: Vec<Feedback>,
}

/// GET /a/{answerset_id}/data — an answer set, its answers, and every
/// question sharing the hash it was computed for.
pub async fn answerset_data(
    State(state): State<SharedState>,
    Extension(identity): Extension<Identity>,
    Path(answerset_id): Path<i64>,
) -> ApiResult<Json<AnswersetData>> {
    let answerset = state
        .answers
        .find_answerset_by_id(answerset_id)
        .await?
        .ok_or_else(|| ApiError::not_found("answerset", answerset_id))?;

    let answers = state.answers.list_answers_by_answerset(answerset_id).await?;
    let questions = state.questions.list_by_hash(&answerset.question_hash).await?;

    Ok(Json(AnswersetData {
        timestamp: Utc::now().to_rfc3339(),
        user: identity.auth.clone(),
        answerset,
        answers,
        questions: questions.iter().map(ApiQuestion::from_row).collect(),
        answerset_graph: Value::Null,
    }))
}

/// GET /a/{answerset_id}/{answer_id}/data — one answer plus its feedback.
pub async fn answer_data(
    State(state): State<SharedState>,
    Extension(identity): Extension<Identity>,
    Path((answerset_id, answer_id)): Path<(i64, i64)>,
) -> ApiResult<Json<AnswerData>> {
    let answer = state
        .answers
        .find_answer_by_id(answer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("answer", answer_id))?;

    // The answer must actually live in the answer set named by the path.
    if answer.answerset_id != answerset_id {
        return Err(ApiError::not_found("answer", answer_id));
    }

    let feedback = state.feedback.list_by_answer(answer_id).await?;

    Ok(Json(AnswerData {
        timestamp: Utc::now().to_rfc3339(),
        user: identity.auth.clone(),
        answer,
        feedback,
    }))
}

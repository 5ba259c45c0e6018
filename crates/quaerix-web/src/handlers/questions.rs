//! Question lifecycle: listing, creation, detail, subgraph, job submission,
//! edit and delete.
//!
//! Mutations are owner-or-admin and fail closed before any store write.

use crate::auth::Identity;
use crate::state::SharedState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use quaerix_common::{ApiError, ApiResult};
use quaerix_db::{NewQuestion, Question, QueryGraph};
use quaerix_queue::JobKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// === API Types ===

/// Question as serialized into API responses, with the stored node/edge
/// columns rehydrated into JSON structures.
#[derive(Debug, Serialize)]
pub struct ApiQuestion {
    pub id: String,
    pub user_id: i64,
    pub name: String,
    pub natural_question: String,
    pub notes: String,
    pub hash: String,
    pub nodes: Value,
    pub edges: Value,
}

impl ApiQuestion {
    pub fn from_row(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            user_id: question.user_id,
            name: question.name.clone(),
            natural_question: question.natural_question.clone(),
            notes: question.notes.clone(),
            hash: question.hash.clone(),
            nodes: serde_json::from_str(&question.nodes).unwrap_or(Value::Null),
            edges: serde_json::from_str(&question.edges).unwrap_or(Value::Null),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionsData {
    pub timestamp: String,
    pub user: crate::auth::AuthData,
    pub questions: Vec<ApiQuestion>,
    pub user_questions: Vec<ApiQuestion>,
}

#[derive(Debug, Serialize)]
pub struct QuestionData {
    pub timestamp: String,
    pub user: crate::auth::AuthData,
    pub question: ApiQuestion,
    pub owner: String,
    pub answerset_list: Vec<quaerix_db::AnswerSet>,
}

#[derive(Debug, Deserialize)]
pub struct NewQuestionRequest {
    pub name: String,
    pub natural: String,
    #[serde(default)]
    pub notes: String,
    pub query: Value,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub question_id: String,
    pub name: String,
    pub notes: String,
    pub natural_question: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub question_id: String,
}

// === Handlers ===

/// GET /questions/data — every question plus the caller's own.
pub async fn questions_data(
    State(state): State<SharedState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<QuestionsData>> {
    let questions = state.questions.list().await?;
    let user_questions = state.questions.list_by_username(&identity.auth.username).await?;

    Ok(Json(QuestionsData {
        timestamp: Utc::now().to_rfc3339(),
        user: identity.auth.clone(),
        questions: questions.iter().map(ApiQuestion::from_row).collect(),
        user_questions: user_questions.iter().map(ApiQuestion::from_row).collect(),
    }))
}

/// POST /q/new — create a question; responds 201 with the generated id.
pub async fn new_submission(
    State(state): State<SharedState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<NewQuestionRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = identity.require_user()?;

    // Validation happens before anything touches the store.
    let graph = QueryGraph::from_value(&body.query)?;

    let question = state
        .questions
        .create(&NewQuestion {
            user_id: user.id,
            name: body.name,
            natural_question: body.natural,
            notes: body.notes,
            graph,
        })
        .await?;

    Ok((StatusCode::CREATED, question.id))
}

/// GET /q/{question_id}/data — question detail, owner, and its answer sets.
pub async fn question_data(
    State(state): State<SharedState>,
    Extension(identity): Extension<Identity>,
    Path(question_id): Path<String>,
) -> ApiResult<Json<QuestionData>> {
    let question = state
        .questions
        .find_by_id(&question_id)
        .await?
        .ok_or_else(|| ApiError::not_found("question", &question_id))?;

    let owner = state
        .users
        .find_by_id(question.user_id)
        .await?
        .ok_or_else(|| {
            ApiError::Internal(anyhow::anyhow!("question {} has no owner row", question.id))
        })?;

    let answerset_list = state.answers.list_answersets_by_hash(&question.hash).await?;

    Ok(Json(QuestionData {
        timestamp: Utc::now().to_rfc3339(),
        user: identity.auth.clone(),
        question: ApiQuestion::from_row(&question),
        owner: owner.email,
        answerset_list,
    }))
}

/// GET /q/{question_id}/subgraph — the knowledge-graph subgraph relevant to
/// this question, computed by the external service.
pub async fn question_subgraph(
    State(state): State<SharedState>,
    Path(question_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let question = state
        .questions
        .find_by_id(&question_id)
        .await?
        .ok_or_else(|| ApiError::not_found("question", &question_id))?;

    let nodes: Value = serde_json::from_str(&question.nodes)
        .map_err(|e| ApiError::Internal(e.into()))?;
    let edges: Value = serde_json::from_str(&question.edges)
        .map_err(|e| ApiError::Internal(e.into()))?;

    let subgraph = state.kg.relevant_subgraph(nodes, edges).await?;
    Ok(Json(subgraph))
}

/// POST /q/{question_id} — submit a background job for this question.
/// Returns 202 with the task id; execution is polled separately.
pub async fn question_action(
    State(state): State<SharedState>,
    Extension(identity): Extension<Identity>,
    Path(question_id): Path<String>,
    Json(body): Json<CommandRequest>,
) -> ApiResult<impl IntoResponse> {
    identity.require_user()?;

    state
        .questions
        .find_by_id(&question_id)
        .await?
        .ok_or_else(|| ApiError::not_found("question", &question_id))?;

    let kind = match body.command.as_str() {
        "answer" => JobKind::AnswerQuestion,
        "update" => JobKind::UpdateKg,
        other => return Err(ApiError::validation(format!("unknown command {:?}", other))),
    };

    let task_id = state.queue.submit(kind, &question_id).await?;
    Ok((StatusCode::ACCEPTED, Json(json!({ "task_id": task_id }))))
}

/// POST /q/edit — update a question's metadata; owner-or-admin only.
pub async fn question_edit(
    State(state): State<SharedState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<EditRequest>,
) -> ApiResult<Json<Value>> {
    tracing::info!(question_id = %body.question_id, "editing question");

    let question = state
        .questions
        .find_by_id(&body.question_id)
        .await?
        .ok_or_else(|| ApiError::not_found("question", &body.question_id))?;
    authorize_owner(&identity, &question)?;

    state
        .questions
        .update_metadata(&body.question_id, &body.name, &body.notes, &body.natural_question)
        .await?;

    Ok(Json(json!({ "message": "success" })))
}

/// POST /q/delete — delete a question; owner-or-admin only.
pub async fn question_delete(
    State(state): State<SharedState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<DeleteRequest>,
) -> ApiResult<Json<Value>> {
    tracing::info!(question_id = %body.question_id, "deleting question");

    let question = state
        .questions
        .find_by_id(&body.question_id)
        .await?
        .ok_or_else(|| ApiError::not_found("question", &body.question_id))?;
    authorize_owner(&identity, &question)?;

    state.questions.delete(&body.question_id).await?;
    Ok(Json(json!({ "message": "success" })))
}

/// Owner-or-admin check for question mutations. Fails closed: anonymous and
/// unrelated callers get 401 before anything is written.
fn authorize_owner(identity: &Identity, question: &Question) -> ApiResult<()> {
    let user = identity.require_user()?;
    if identity.auth.is_admin || user.id == question.user_id {
        Ok(())
    } else {
        Err(ApiError::unauthorized())
    }
}

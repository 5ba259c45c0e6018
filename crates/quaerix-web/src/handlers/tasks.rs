//! Job status polling and queue introspection.

use crate::state::SharedState;
use axum::extract::{Path, State};
use axum::Json;
use quaerix_common::{ApiError, ApiResult};
use quaerix_queue::QueueSnapshot;
use uuid::Uuid;

/// GET /status/{task_id} — the task's state as a plain string
/// (PENDING / STARTED / SUCCESS / FAILURE).
pub async fn task_status(
    State(state): State<SharedState>,
    Path(task_id): Path<String>,
) -> ApiResult<String> {
    let task_id = Uuid::parse_str(&task_id)
        .map_err(|_| ApiError::validation(format!("invalid task id {:?}", task_id)))?;
    Ok(state.queue.status(task_id).await.to_string())
}

/// GET /tasks — queued/active jobs grouped by worker role.
pub async fn tasks_list(State(state): State<SharedState>) -> Json<QueueSnapshot> {
    Json(state.queue.snapshot().await)
}

//! Axum router — maps all URL paths to handlers.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::identity_middleware;
use crate::handlers::{
    admin::admin_data,
    answers::{answer_data, answerset_data},
    feedback::feedback_submit,
    landing::{account_data, landing_data, new_data},
    questions::{
        new_submission, question_action, question_data, question_delete, question_edit,
        question_subgraph, questions_data,
    },
    tasks::{task_status, tasks_list},
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Page data
        .route("/landing/data",   get(landing_data))
        .route("/account/data",   get(account_data))
        .route("/q/new/data",     get(new_data))
        .route("/questions/data", get(questions_data))

        // Question lifecycle
        .route("/q/new",    post(new_submission))
        .route("/q/edit",   post(question_edit))
        .route("/q/delete", post(question_delete))
        .route("/q/{question_id}/data",     get(question_data))
        .route("/q/{question_id}/subgraph", get(question_subgraph))
        .route("/q/{question_id}",          post(question_action))

        // Answers and feedback
        .route("/a/feedback", post(feedback_submit))
        .route("/a/{answerset_id}/data",             get(answerset_data))
        .route("/a/{answerset_id}/{answer_id}/data", get(answer_data))

        // Admin
        .route("/admin/data", get(admin_data))

        // Job queue
        .route("/status/{task_id}", get(task_status))
        .route("/tasks",            get(tasks_list))

        // Middleware
        .layer(middleware::from_fn_with_state(shared.clone(), identity_middleware))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

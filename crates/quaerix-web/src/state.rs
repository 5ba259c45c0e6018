//! Shared application state for the web server.
//!
//! Constructed once at startup and handed to every handler; nothing is
//! cached across requests beyond the connection pool itself.

use quaerix_db::{
    AnswerRepository, Database, FeedbackRepository, QuestionRepository, SessionRepository,
    UserRepository,
};
use quaerix_kg::KgClient;
use quaerix_queue::QueueClient;
use std::sync::Arc;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub sessions: SessionRepository,
    pub questions: QuestionRepository,
    pub answers: AnswerRepository,
    pub feedback: FeedbackRepository,
    pub queue: Arc<dyn QueueClient>,
    pub kg: KgClient,
}

impl AppState {
    pub fn new(db: Database, queue: Arc<dyn QueueClient>, kg: KgClient) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            sessions: SessionRepository::new(db.clone()),
            questions: QuestionRepository::new(db.clone()),
            answers: AnswerRepository::new(db.clone()),
            feedback: FeedbackRepository::new(db),
            queue,
            kg,
        }
    }
}

pub type SharedState = Arc<AppState>;

//! Entity structs mapped to the relational schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::QueryGraph;

/// Account record. Written by the external authentication subsystem; this
/// layer reads it for identity resolution and admin listings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// Hashed credential. Never serialized into API responses.
    #[serde(skip_serializing)]
    pub password: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub current_login_at: Option<DateTime<Utc>>,
    pub last_login_ip: Option<String>,
    pub current_login_ip: Option<String>,
    pub login_count: Option<i64>,
    pub active: bool,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Named permission group, e.g. "admin".
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Bearer-token session resolved by the identity middleware.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    #[serde(skip_serializing)]
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A stored graph-shaped query template plus metadata, owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: String,
    pub user_id: i64,
    pub name: String,
    pub natural_question: String,
    pub notes: String,
    pub hash: String,
    pub nodes: String,
    pub edges: String,
}

impl Question {
    /// Rehydrate the stored canonical graph.
    pub fn graph(&self) -> crate::error::Result<QueryGraph> {
        QueryGraph::from_stored(&self.nodes, &self.edges)
    }
}

/// Input for creating a question. The graph must already be canonical.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub user_id: i64,
    pub name: String,
    pub natural_question: String,
    pub notes: String,
    pub graph: QueryGraph,
}

/// The result bundle from one execution of a question (by content hash)
/// against the knowledge graph. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnswerSet {
    pub id: i64,
    pub question_hash: String,
    pub created_at: DateTime<Utc>,
}

/// One result row within an answer set.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Answer {
    pub id: i64,
    pub answerset_id: i64,
    pub natural_answer: Option<String>,
    pub nodes: Option<String>,
    pub edges: Option<String>,
    pub score: Option<f64>,
}

/// Input for the answering job's write path.
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub answerset_id: i64,
    pub natural_answer: Option<String>,
    pub nodes: Option<String>,
    pub edges: Option<String>,
    pub score: Option<f64>,
}

/// A user's rating/notes on one (question, answer) pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub question_id: String,
    pub answer_id: i64,
    pub impact: Option<i64>,
    pub accuracy: Option<i64>,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Input for creating a feedback row. Duplicates for the same
/// (user, question, answer) triple are permitted.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFeedback {
    pub user_id: i64,
    pub question_id: String,
    pub answer_id: i64,
    pub impact: Option<i64>,
    pub accuracy: Option<i64>,
    pub notes: Option<String>,
}

/// Input for the external auth subsystem's user write path (also used to
/// seed test fixtures).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub active: bool,
}

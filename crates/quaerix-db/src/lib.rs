//! Quaerix storage layer.
//!
//! Relational store for users, roles, sessions, questions, answer sets,
//! answers, and feedback, accessed through one repository per entity family.
//! Questions carry a content hash derived from their canonical graph
//! structure; answer sets are keyed by that hash so structurally identical
//! questions share results.

pub mod answers;
pub mod database;
pub mod error;
pub mod feedback;
pub mod graph;
pub mod questions;
pub mod schema;
pub mod sessions;
pub mod users;

pub use answers::AnswerRepository;
pub use database::Database;
pub use error::{DbError, Result};
pub use feedback::FeedbackRepository;
pub use graph::{QEdge, QNode, QueryGraph};
pub use questions::QuestionRepository;
pub use schema::{
    Answer, AnswerSet, Feedback, NewAnswer, NewFeedback, NewQuestion, NewUser, Question, Role,
    Session, User,
};
pub use sessions::SessionRepository;
pub use users::UserRepository;

//! Job and task-state types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Worker roles, one bounded pool each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRole {
    Answerer,
    Updater,
}

/// The two background computations this service dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    AnswerQuestion,
    UpdateKg,
}

impl JobKind {
    /// Which worker pool executes this kind of job.
    pub fn role(&self) -> WorkerRole {
        match self {
            JobKind::AnswerQuestion => WorkerRole::Answerer,
            JobKind::UpdateKg => WorkerRole::Updater,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::AnswerQuestion => "answer_question",
            JobKind::UpdateKg => "update_kg",
        }
    }
}

/// A submitted job: which computation, for which question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub kind: JobKind,
    pub question_id: String,
}

impl Job {
    pub fn new(kind: JobKind, question_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            question_id: question_id.into(),
        }
    }
}

/// Task lifecycle states, reported as uppercase strings by the status route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Pending,
    Started,
    Success,
    Failure,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "PENDING",
            TaskState::Started => "STARTED",
            TaskState::Success => "SUCCESS",
            TaskState::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_to_role() {
        assert_eq!(JobKind::AnswerQuestion.role(), WorkerRole::Answerer);
        assert_eq!(JobKind::UpdateKg.role(), WorkerRole::Updater);
    }

    #[test]
    fn test_state_strings() {
        assert_eq!(TaskState::Pending.to_string(), "PENDING");
        assert_eq!(TaskState::Started.to_string(), "STARTED");
        assert_eq!(TaskState::Success.to_string(), "SUCCESS");
        assert_eq!(TaskState::Failure.to_string(), "FAILURE");
    }

    #[test]
    fn test_jobs_get_distinct_ids() {
        let a = Job::new(JobKind::AnswerQuestion, "q1");
        let b = Job::new(JobKind::AnswerQuestion, "q1");
        assert_ne!(a.id, b.id);
    }
}

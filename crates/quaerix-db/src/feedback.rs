//! Feedback store.
//!
//! One row per submission: a user's impact/accuracy ratings and notes on a
//! specific (question, answer) pair. Duplicate submissions are allowed; each
//! becomes its own row. Whether the answer actually belongs to an answer set
//! generated for the question's hash is not enforced here; only the
//! per-answerset listing applies that membership filter.

use crate::database::Database;
use crate::error::Result;
use crate::schema::{Feedback, NewFeedback};
use chrono::Utc;

/// Repository for feedback operations.
#[derive(Clone)]
pub struct FeedbackRepository {
    db: Database,
}

impl FeedbackRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a feedback row immediately, stamping the creation time.
    pub async fn create(&self, feedback: &NewFeedback) -> Result<Feedback> {
        let timestamp = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO feedback
                 (user_id, question_id, answer_id, impact, accuracy, notes, timestamp)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(feedback.user_id)
        .bind(&feedback.question_id)
        .bind(feedback.answer_id)
        .bind(feedback.impact)
        .bind(feedback.accuracy)
        .bind(&feedback.notes)
        .bind(timestamp)
        .fetch_one(self.db.pool())
        .await?;

        Ok(Feedback {
            id,
            user_id: feedback.user_id,
            question_id: feedback.question_id.clone(),
            answer_id: feedback.answer_id,
            impact: feedback.impact,
            accuracy: feedback.accuracy,
            notes: feedback.notes.clone(),
            timestamp,
        })
    }

    /// Find a feedback row by primary key.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>("SELECT * FROM feedback WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(feedback)
    }

    /// All feedback attached to a question.
    pub async fn list_by_question(&self, question_id: &str) -> Result<Vec<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            "SELECT * FROM feedback WHERE question_id = $1",
        )
        .bind(question_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(feedback)
    }

    /// Feedback for a question restricted to answers within one answer set.
    pub async fn list_by_question_answerset(
        &self,
        question_id: &str,
        answerset_id: i64,
    ) -> Result<Vec<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            "SELECT * FROM feedback
             WHERE question_id = $1
               AND answer_id IN (SELECT id FROM answer WHERE answerset_id = $2)",
        )
        .bind(question_id)
        .bind(answerset_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(feedback)
    }

    /// Feedback for one specific (question, answer) pair.
    pub async fn list_by_question_answer(
        &self,
        question_id: &str,
        answer_id: i64,
    ) -> Result<Vec<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            "SELECT * FROM feedback WHERE question_id = $1 AND answer_id = $2",
        )
        .bind(question_id)
        .bind(answer_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(feedback)
    }

    /// All feedback attached to one answer, regardless of question.
    pub async fn list_by_answer(&self, answer_id: i64) -> Result<Vec<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            "SELECT * FROM feedback WHERE answer_id = $1",
        )
        .bind(answer_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerRepository;
    use crate::graph::QueryGraph;
    use crate::questions::QuestionRepository;
    use crate::schema::{NewAnswer, NewQuestion, NewUser};
    use crate::users::UserRepository;
    use serde_json::json;

    struct Fixtures {
        feedback: FeedbackRepository,
        user_id: i64,
        question_id: String,
        answerset_id: i64,
        answer_id: i64,
        other_answer_id: i64,
    }

    async fn fixtures() -> Fixtures {
        let db = Database::open_in_memory().await.unwrap();
        db.initialize().await.unwrap();

        let users = UserRepository::new(db.clone());
        let questions = QuestionRepository::new(db.clone());
        let answers = AnswerRepository::new(db.clone());

        let user_id = users
            .insert(&NewUser {
                email: "ada@example.org".to_string(),
                username: "ada".to_string(),
                password: "argon2id$stub".to_string(),
                active: true,
            })
            .await
            .unwrap();

        let graph = QueryGraph::from_value(&json!({
            "nodes": [{"id": "n0", "type": "gene"}, {"id": "n1", "type": "disease"}],
            "edges": [{"source_id": "n0", "target_id": "n1"}]
        }))
        .unwrap();

        let question = questions
            .create(&NewQuestion {
                user_id,
                name: "Q".to_string(),
                natural_question: "which genes?".to_string(),
                notes: String::new(),
                graph,
            })
            .await
            .unwrap();

        let answerset = answers.insert_answerset(&question.hash).await.unwrap();
        let answer_id = answers
            .insert_answer(&NewAnswer {
                answerset_id: answerset.id,
                natural_answer: None,
                nodes: None,
                edges: None,
                score: Some(0.8),
            })
            .await
            .unwrap();

        // Second answer set with its own answer, same question hash.
        let other_set = answers.insert_answerset(&question.hash).await.unwrap();
        let other_answer_id = answers
            .insert_answer(&NewAnswer {
                answerset_id: other_set.id,
                natural_answer: None,
                nodes: None,
                edges: None,
                score: Some(0.1),
            })
            .await
            .unwrap();

        Fixtures {
            feedback: FeedbackRepository::new(db),
            user_id,
            question_id: question.id,
            answerset_id: answerset.id,
            answer_id,
            other_answer_id,
        }
    }

    fn entry(f: &Fixtures, answer_id: i64) -> NewFeedback {
        NewFeedback {
            user_id: f.user_id,
            question_id: f.question_id.clone(),
            answer_id,
            impact: Some(4),
            accuracy: Some(5),
            notes: Some("plausible".to_string()),
        }
    }

    #[tokio::test]
    async fn test_duplicates_are_permitted() {
        let f = fixtures().await;
        let first = f.feedback.create(&entry(&f, f.answer_id)).await.unwrap();
        let second = f.feedback.create(&entry(&f, f.answer_id)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(
            f.feedback
                .list_by_question_answer(&f.question_id, f.answer_id)
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let f = fixtures().await;
        let created = f.feedback.create(&entry(&f, f.answer_id)).await.unwrap();
        let fetched = f.feedback.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.impact, Some(4));
        assert_eq!(fetched.question_id, f.question_id);
    }

    #[tokio::test]
    async fn test_answerset_listing_filters_membership() {
        let f = fixtures().await;
        f.feedback.create(&entry(&f, f.answer_id)).await.unwrap();
        f.feedback.create(&entry(&f, f.other_answer_id)).await.unwrap();

        // Both rows belong to the question...
        assert_eq!(f.feedback.list_by_question(&f.question_id).await.unwrap().len(), 2);

        // ...but only one answer is a member of the first answer set.
        let scoped = f
            .feedback
            .list_by_question_answerset(&f.question_id, f.answerset_id)
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].answer_id, f.answer_id);
    }

    #[tokio::test]
    async fn test_create_rejects_dangling_references() {
        let f = fixtures().await;
        let mut bad = entry(&f, f.answer_id);
        bad.question_id = "nosuchid0000".to_string();
        assert!(f.feedback.create(&bad).await.is_err());
    }
}

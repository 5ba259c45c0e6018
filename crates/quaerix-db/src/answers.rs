//! Answer store.
//!
//! Answer sets are keyed by a question's content hash, so every question
//! sharing a structure shares result bundles. The HTTP layer only reads;
//! the insert operations belong to the external answering job's write path.

use crate::database::Database;
use crate::error::Result;
use crate::schema::{Answer, AnswerSet, NewAnswer};
use chrono::Utc;

/// Repository for answer set and answer operations.
#[derive(Clone)]
pub struct AnswerRepository {
    db: Database,
}

impl AnswerRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Find an answer set by primary key.
    pub async fn find_answerset_by_id(&self, id: i64) -> Result<Option<AnswerSet>> {
        let answerset = sqlx::query_as::<_, AnswerSet>("SELECT * FROM answerset WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(answerset)
    }

    /// All answer sets computed for a question hash, newest first.
    pub async fn list_answersets_by_hash(&self, hash: &str) -> Result<Vec<AnswerSet>> {
        let answersets = sqlx::query_as::<_, AnswerSet>(
            "SELECT * FROM answerset WHERE question_hash = $1 ORDER BY created_at DESC",
        )
        .bind(hash)
        .fetch_all(self.db.pool())
        .await?;
        Ok(answersets)
    }

    /// List all answer sets.
    pub async fn list_answersets(&self) -> Result<Vec<AnswerSet>> {
        let answersets = sqlx::query_as::<_, AnswerSet>("SELECT * FROM answerset")
            .fetch_all(self.db.pool())
            .await?;
        Ok(answersets)
    }

    /// Find an answer by primary key.
    pub async fn find_answer_by_id(&self, id: i64) -> Result<Option<Answer>> {
        let answer = sqlx::query_as::<_, Answer>("SELECT * FROM answer WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(answer)
    }

    /// All answers within an answer set, best score first.
    pub async fn list_answers_by_answerset(&self, answerset_id: i64) -> Result<Vec<Answer>> {
        let answers = sqlx::query_as::<_, Answer>(
            "SELECT * FROM answer WHERE answerset_id = $1 ORDER BY score DESC",
        )
        .bind(answerset_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(answers)
    }

    /// Record a new answer set for a question hash (job write path).
    pub async fn insert_answerset(&self, question_hash: &str) -> Result<AnswerSet> {
        let created_at = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO answerset (question_hash, created_at)
             VALUES ($1, $2)
             RETURNING id",
        )
        .bind(question_hash)
        .bind(created_at)
        .fetch_one(self.db.pool())
        .await?;

        Ok(AnswerSet {
            id,
            question_hash: question_hash.to_string(),
            created_at,
        })
    }

    /// Record one answer within an answer set (job write path).
    pub async fn insert_answer(&self, answer: &NewAnswer) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO answer (answerset_id, natural_answer, nodes, edges, score)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(answer.answerset_id)
        .bind(&answer.natural_answer)
        .bind(&answer.nodes)
        .bind(&answer.edges)
        .bind(answer.score)
        .fetch_one(self.db.pool())
        .await?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> AnswerRepository {
        let db = Database::open_in_memory().await.unwrap();
        db.initialize().await.unwrap();
        AnswerRepository::new(db)
    }

    fn answer(answerset_id: i64, score: f64) -> NewAnswer {
        NewAnswer {
            answerset_id,
            natural_answer: Some("KCNJ11".to_string()),
            nodes: Some("[]".to_string()),
            edges: Some("[]".to_string()),
            score: Some(score),
        }
    }

    #[tokio::test]
    async fn test_empty_listings_are_not_errors() {
        let answers = repo().await;
        assert!(answers.list_answersets_by_hash("deadbeef").await.unwrap().is_empty());
        assert!(answers.list_answers_by_answerset(1).await.unwrap().is_empty());
        assert!(answers.list_answersets().await.unwrap().is_empty());
        assert!(answers.find_answerset_by_id(1).await.unwrap().is_none());
        assert!(answers.find_answer_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_answersets_grouped_by_hash() {
        let answers = repo().await;
        let a = answers.insert_answerset("hash-a").await.unwrap();
        answers.insert_answerset("hash-a").await.unwrap();
        answers.insert_answerset("hash-b").await.unwrap();

        assert_eq!(answers.list_answersets_by_hash("hash-a").await.unwrap().len(), 2);
        assert_eq!(answers.list_answersets_by_hash("hash-b").await.unwrap().len(), 1);
        assert_eq!(answers.list_answersets().await.unwrap().len(), 3);

        let fetched = answers.find_answerset_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(fetched.question_hash, "hash-a");
    }

    #[tokio::test]
    async fn test_answers_listed_best_first() {
        let answers = repo().await;
        let set = answers.insert_answerset("hash-a").await.unwrap();
        answers.insert_answer(&answer(set.id, 0.3)).await.unwrap();
        answers.insert_answer(&answer(set.id, 0.9)).await.unwrap();

        let listed = answers.list_answers_by_answerset(set.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].score, Some(0.9));
    }

    #[tokio::test]
    async fn test_answer_requires_existing_answerset() {
        let answers = repo().await;
        assert!(answers.insert_answer(&answer(404, 0.5)).await.is_err());
    }
}

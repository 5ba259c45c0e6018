//! Question store.
//!
//! Questions are keyed by a 12-character alphanumeric token. Generation is
//! verified-unique: each candidate is checked against existing rows and
//! regenerated on collision, with the insert itself as the final arbiter.

use crate::database::Database;
use crate::error::{DbError, Result};
use crate::schema::{NewQuestion, Question};
use quaerix_common::question_token;

/// Attempts before giving up on id allocation. With a 62^12 space this only
/// trips if the generator is broken.
const MAX_ID_ATTEMPTS: usize = 8;

/// Repository for question operations.
#[derive(Clone)]
pub struct QuestionRepository {
    db: Database,
}

impl QuestionRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a new question and return the stored row.
    ///
    /// The caller supplies an already-canonical graph; the content hash and
    /// serialized node/edge columns are derived here so they cannot drift.
    pub async fn create(&self, question: &NewQuestion) -> Result<Question> {
        let hash = question.graph.content_hash();
        let nodes = question.graph.nodes_json();
        let edges = question.graph.edges_json();

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = question_token();

            let inserted = sqlx::query(
                "INSERT INTO question
                     (id, user_id, name, natural_question, notes, hash, nodes, edges)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(&id)
            .bind(question.user_id)
            .bind(&question.name)
            .bind(&question.natural_question)
            .bind(&question.notes)
            .bind(&hash)
            .bind(&nodes)
            .bind(&edges)
            .execute(self.db.pool())
            .await?;

            if inserted.rows_affected() == 1 {
                tracing::info!(question_id = %id, hash = %hash, "created question");
                return Ok(Question {
                    id,
                    user_id: question.user_id,
                    name: question.name.clone(),
                    natural_question: question.natural_question.clone(),
                    notes: question.notes.clone(),
                    hash,
                    nodes,
                    edges,
                });
            }

            tracing::warn!(question_id = %id, "question id collision, regenerating");
        }

        Err(DbError::IdAllocation)
    }

    /// Find a question by its identifier.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>("SELECT * FROM question WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(question)
    }

    /// All questions sharing a content hash (structurally identical templates).
    pub async fn list_by_hash(&self, hash: &str) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>("SELECT * FROM question WHERE hash = $1")
            .bind(hash)
            .fetch_all(self.db.pool())
            .await?;
        Ok(questions)
    }

    /// List all questions.
    pub async fn list(&self) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>("SELECT * FROM question")
            .fetch_all(self.db.pool())
            .await?;
        Ok(questions)
    }

    /// Questions owned by the user with the given username.
    pub async fn list_by_username(&self, username: &str) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT q.* FROM question q
             JOIN user u ON u.id = q.user_id
             WHERE u.username = $1",
        )
        .bind(username)
        .fetch_all(self.db.pool())
        .await?;
        Ok(questions)
    }

    /// Update the metadata fields only; the graph and hash are immutable.
    pub async fn update_metadata(
        &self,
        id: &str,
        name: &str,
        notes: &str,
        natural_question: &str,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE question SET name = $1, notes = $2, natural_question = $3 WHERE id = $4",
        )
        .bind(name)
        .bind(notes)
        .bind(natural_question)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("question {}", id)));
        }
        Ok(())
    }

    /// Delete a question by id.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM question WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("question {}", id)));
        }
        tracing::info!(question_id = %id, "deleted question");
        Ok(())
    }
}

//! Session store: bearer-token resolution for the identity middleware.
//!
//! Session rows are created by the external authentication subsystem on
//! login; this layer only resolves tokens to users, ignoring expired rows.

use crate::database::Database;
use crate::error::Result;
use crate::schema::User;
use chrono::{DateTime, Utc};

#[derive(Clone)]
pub struct SessionRepository {
    db: Database,
}

impl SessionRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Resolve a bearer token to its user. Expired or unknown tokens
    /// resolve to `None`.
    pub async fn find_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT u.* FROM user u
             JOIN session s ON s.user_id = u.id
             WHERE s.token = $1
               AND (s.expires_at IS NULL OR s.expires_at > $2)",
        )
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(self.db.pool())
        .await?;
        Ok(user)
    }

    /// Record a session token for a user (the auth subsystem's write path).
    pub async fn insert(
        &self,
        user_id: i64,
        token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO session (user_id, token, created_at, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(user_id)
        .bind(token)
        .bind(Utc::now())
        .bind(expires_at)
        .fetch_one(self.db.pool())
        .await?;
        Ok(id)
    }
}

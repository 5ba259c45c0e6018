//! Identity store.
//!
//! Read operations for account records and role membership. Account rows are
//! written by the external authentication subsystem; the insert/grant
//! functions exist for that write path and for test fixtures.

use crate::database::Database;
use crate::error::Result;
use crate::schema::{NewUser, User};

/// Repository for user and role lookups.
#[derive(Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM user WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(user)
    }

    /// Find a user by unique email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM user WHERE email = $1")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(user)
    }

    /// List all users, order unspecified.
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM user")
            .fetch_all(self.db.pool())
            .await?;
        Ok(users)
    }

    /// True iff the user holds the role with the given name.
    pub async fn has_role(&self, user_id: i64, role_name: &str) -> Result<bool> {
        let found: Option<(i64,)> = sqlx::query_as(
            "SELECT ru.id FROM roles_users ru
             JOIN role r ON r.id = ru.role_id
             WHERE ru.user_id = $1 AND r.name = $2
             LIMIT 1",
        )
        .bind(user_id)
        .bind(role_name)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(found.is_some())
    }

    /// Insert an account record, returning its id.
    pub async fn insert(&self, user: &NewUser) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO user (email, username, password, active)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.active)
        .fetch_one(self.db.pool())
        .await?;
        Ok(id)
    }

    /// Grant a named role to a user, creating the role row if needed.
    pub async fn grant_role(&self, user_id: i64, role_name: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO role (name) VALUES ($1)")
            .bind(role_name)
            .execute(self.db.pool())
            .await?;

        sqlx::query(
            "INSERT INTO roles_users (user_id, role_id)
             SELECT $1, id FROM role WHERE name = $2",
        )
        .bind(user_id)
        .bind(role_name)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

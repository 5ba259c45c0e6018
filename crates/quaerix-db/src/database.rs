//! Database connection and schema bootstrap.
//!
//! Provides a unified handle over an SQLite pool. `initialize` creates the
//! tables if they don't exist, so a fresh file (or in-memory store) is usable
//! immediately.

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Main database handle.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create a database at the given URL (e.g. `sqlite://quaerix.db`).
    ///
    /// Foreign-key enforcement is switched on for every connection.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(sqlx::Error::from)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// The pool is pinned to a single connection: each SQLite `:memory:`
    /// connection is its own database, so a wider pool would see empty tables.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(sqlx::Error::from)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create all tables and indexes if they don't exist.
    pub async fn initialize(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS user (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        email             TEXT NOT NULL UNIQUE,
        username          TEXT NOT NULL,
        password          TEXT NOT NULL,
        last_login_at     TEXT,
        current_login_at  TEXT,
        last_login_ip     TEXT,
        current_login_ip  TEXT,
        login_count       INTEGER,
        active            BOOLEAN NOT NULL DEFAULT TRUE,
        confirmed_at      TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS role (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL UNIQUE,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS roles_users (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES user(id),
        role_id INTEGER NOT NULL REFERENCES role(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS session (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id    INTEGER NOT NULL REFERENCES user(id),
        token      TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL,
        expires_at TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS question (
        id               TEXT PRIMARY KEY,
        user_id          INTEGER NOT NULL REFERENCES user(id),
        name             TEXT NOT NULL,
        natural_question TEXT NOT NULL,
        notes            TEXT NOT NULL,
        hash             TEXT NOT NULL,
        nodes            TEXT NOT NULL,
        edges            TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_question_hash ON question(hash)",
    r#"
    CREATE TABLE IF NOT EXISTS answerset (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        question_hash TEXT NOT NULL,
        created_at    TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_answerset_hash ON answerset(question_hash)",
    r#"
    CREATE TABLE IF NOT EXISTS answer (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        answerset_id   INTEGER NOT NULL REFERENCES answerset(id),
        natural_answer TEXT,
        nodes          TEXT,
        edges          TEXT,
        score          REAL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_answer_answerset ON answer(answerset_id)",
    r#"
    CREATE TABLE IF NOT EXISTS feedback (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id     INTEGER NOT NULL REFERENCES user(id),
        question_id TEXT NOT NULL REFERENCES question(id),
        answer_id   INTEGER NOT NULL REFERENCES answer(id),
        impact      INTEGER,
        accuracy    INTEGER,
        notes       TEXT,
        timestamp   TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_feedback_answer ON feedback(answer_id)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_question ON feedback(question_id)",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let db = Database::open_in_memory().await.unwrap();
        db.initialize().await.unwrap();
        db.initialize().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        for expected in [
            "user",
            "role",
            "roles_users",
            "session",
            "question",
            "answerset",
            "answer",
            "feedback",
        ] {
            assert!(names.contains(&expected), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_foreign_keys_are_enforced() {
        let db = Database::open_in_memory().await.unwrap();
        db.initialize().await.unwrap();

        let result = sqlx::query(
            "INSERT INTO question (id, user_id, name, natural_question, notes, hash, nodes, edges)
             VALUES ('abc123def456', 999, 'q', 'q?', '', 'h', '[]', '[]')",
        )
        .execute(db.pool())
        .await;

        assert!(result.is_err(), "insert with dangling user_id should fail");
    }
}

//! SQLite persistence for the ban list.
//!
//! One table, `banned_users`, keyed by user id. Reads run concurrently on the pool;
//! SQLite serializes the writes.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::{ban::BanStore, domain::UserId, Result};

/// A persisted ban. Existence of the row means the user is banned.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct BannedUserRecord {
    pub user_id: i64,
    pub banned_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SqliteBanStore {
    pool: SqlitePool,
}

impl SqliteBanStore {
    /// Open (and create if missing) the database at `database_url`.
    ///
    /// Accepts `sqlite://path`, a bare path or `sqlite::memory:`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!(url = %database_url, "opening ban list database");

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // An in-memory database lives and dies with its connection.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 4 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS banned_users (
                user_id INTEGER PRIMARY KEY NOT NULL,
                banned_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Close the pool. Later calls fail with a store error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl BanStore for SqliteBanStore {
    async fn contains(&self, user: UserId) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT user_id FROM banned_users WHERE user_id = ?")
            .bind(user.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn insert(&self, user: UserId) -> Result<bool> {
        let res = sqlx::query("INSERT OR IGNORE INTO banned_users (user_id, banned_at) VALUES (?, ?)")
            .bind(user.0)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn remove(&self, user: UserId) -> Result<bool> {
        let res = sqlx::query("DELETE FROM banned_users WHERE user_id = ?")
            .bind(user.0)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<BannedUserRecord>> {
        let rows = sqlx::query_as::<_, BannedUserRecord>(
            "SELECT user_id, banned_at FROM banned_users ORDER BY banned_at, user_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

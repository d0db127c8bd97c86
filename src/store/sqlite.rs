use crate::store::{GateStore, StoreError, StoreResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Storage key for the last-tracked timestamp, scoped to one store origin.
pub const GATE_KEY: &str = "portfolio_last_tracked";

pub struct SqliteGateStore {
    pool: Arc<SqlitePool>,
}

impl SqliteGateStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        // Single writer, single cell: one connection is enough, and it keeps
        // `sqlite::memory:` databases coherent across calls.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl GateStore for SqliteGateStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tracking_gate (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn last_tracked(&self) -> StoreResult<Option<i64>> {
        let row = sqlx::query("SELECT value FROM tracking_gate WHERE key = ?")
            .bind(GATE_KEY)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| StoreError::Other(e.into()))?;

        match row {
            Some(row) => {
                let value: String = row.get("value");
                value
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| StoreError::Corrupt)
            }
            None => Ok(None),
        }
    }

    async fn set_last_tracked(&self, epoch_ms: i64) -> Result<()> {
        // The value is stored as a decimal string to match the original
        // storage format for this key.
        sqlx::query(
            r#"
            INSERT INTO tracking_gate (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(GATE_KEY)
        .bind(epoch_ms.to_string())
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM tracking_gate WHERE key = ?")
            .bind(GATE_KEY)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}

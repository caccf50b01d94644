//! SQLite-backed item store (sqlx).
//!
//! Content fields are persisted as one JSON column; linkage, status, and
//! timestamps are plain columns so status queries stay indexable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use vitrine_core::{Item, ItemContent, ItemStatus};

use super::ItemStore;
use crate::error::StoreError;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS items (
    business_key      TEXT PRIMARY KEY,
    content           TEXT NOT NULL,
    remote_product_id TEXT,
    status            TEXT NOT NULL,
    updated_at        TEXT NOT NULL,
    published_at      TEXT
);
CREATE INDEX IF NOT EXISTS idx_items_status ON items (status);
";

/// Persistent item store for single-process operation.
pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    /// Open (and create if missing) the database at `url`, e.g.
    /// `sqlite://vitrine.db` or `sqlite::memory:`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<Item>, StoreError> {
        let row: Option<ItemRow> = sqlx::query_as(
            r"
            SELECT business_key, content, remote_product_id, status, updated_at, published_at
            FROM items
            WHERE business_key = $1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(ItemRow::into_item).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Item>, StoreError> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r"
            SELECT business_key, content, remote_product_id, status, updated_at, published_at
            FROM items
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(ItemRow::into_item).collect()
    }

    async fn find_by_status(&self, status: ItemStatus) -> Result<Vec<Item>, StoreError> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r"
            SELECT business_key, content, remote_product_id, status, updated_at, published_at
            FROM items
            WHERE status = $1
            ",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(ItemRow::into_item).collect()
    }

    async fn save(&self, item: &Item) -> Result<(), StoreError> {
        let content = serde_json::to_string(&item.content)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO items (business_key, content, remote_product_id, status, updated_at, published_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (business_key) DO UPDATE SET
                content = excluded.content,
                remote_product_id = excluded.remote_product_id,
                status = excluded.status,
                updated_at = excluded.updated_at,
                published_at = excluded.published_at
            ",
        )
        .bind(&item.business_key)
        .bind(content)
        .bind(&item.remote_product_id)
        .bind(item.status.as_str())
        .bind(item.updated_at.to_rfc3339())
        .bind(item.published_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn update(&self, item: &Item) -> Result<(), StoreError> {
        let content = serde_json::to_string(&item.content)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let result = sqlx::query(
            r"
            UPDATE items
            SET content = $2,
                remote_product_id = $3,
                status = $4,
                updated_at = $5,
                published_at = $6
            WHERE business_key = $1
            ",
        )
        .bind(&item.business_key)
        .bind(content)
        .bind(&item.remote_product_id)
        .bind(item.status.as_str())
        .bind(item.updated_at.to_rfc3339())
        .bind(item.published_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                key: item.business_key.clone(),
            });
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM items WHERE business_key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Row shape of the items table.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    business_key: String,
    content: String,
    remote_product_id: Option<String>,
    status: String,
    updated_at: String,
    published_at: Option<String>,
}

impl ItemRow {
    fn into_item(self) -> Result<Item, StoreError> {
        let content: ItemContent = serde_json::from_str(&self.content)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let status: ItemStatus = self
            .status
            .parse()
            .map_err(|e: vitrine_core::InvalidStatus| StoreError::Serialization(e.to_string()))?;
        let updated_at = parse_timestamp(&self.updated_at)?;
        let published_at = self
            .published_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(Item {
            business_key: self.business_key,
            content,
            remote_product_id: self.remote_product_id,
            status,
            updated_at,
            published_at,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Serialization(format!("bad timestamp '{raw}': {e}")))
}

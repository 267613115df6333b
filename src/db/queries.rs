use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::models::{ContentRecord, NewContentRecord};

/// Insert a content log row, returning its ID.
pub async fn store_content(pool: &SqlitePool, record: &NewContentRecord) -> Result<i64> {
    let metadata = record
        .metadata
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .context("Failed to serialize content metadata")?;

    let result = sqlx::query(
        r"
        INSERT INTO content_history (topic, platform, content, metadata)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(&record.topic)
    .bind(&record.platform)
    .bind(&record.content)
    .bind(metadata)
    .execute(pool)
    .await
    .context("Failed to store content")?;

    Ok(result.last_insert_rowid())
}

/// Most recent content log rows, newest first.
pub async fn get_content_history(pool: &SqlitePool, limit: i64) -> Result<Vec<ContentRecord>> {
    sqlx::query_as(
        r"
        SELECT id, topic, platform, content, metadata, created_at
        FROM content_history
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        ",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("Failed to fetch content history")
}

/// Number of content log rows.
pub async fn count_content(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM content_history")
        .fetch_one(pool)
        .await
        .context("Failed to count content history")?;
    Ok(count)
}

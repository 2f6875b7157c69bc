//! Sequence Repository
//!
//! Per-day counters keyed by (name, date). Allocation is a single UPSERT
//! so the read-increment-write happens under SQLite's write lock.

use super::RepoResult;
use sqlx::{SqliteConnection, SqliteExecutor};

/// Counter used for human-facing order numbers
pub const ORDER_NUMBER: &str = "order_number";

/// Allocate the next value for `(name, date)`, starting at 1
pub async fn next_value(conn: &mut SqliteConnection, name: &str, date: &str) -> RepoResult<i64> {
    let value = sqlx::query_scalar::<_, i64>(
        "INSERT INTO sequence (name, seq_date, value) VALUES (?1, ?2, 1) \
         ON CONFLICT(name, seq_date) DO UPDATE SET value = value + 1 \
         RETURNING value",
    )
    .bind(name)
    .bind(date)
    .fetch_one(&mut *conn)
    .await?;
    Ok(value)
}

/// Last value handed out for `(name, date)`, `None` if never allocated
pub async fn current_value<'e>(
    ex: impl SqliteExecutor<'e>,
    name: &str,
    date: &str,
) -> RepoResult<Option<i64>> {
    let value = sqlx::query_scalar::<_, i64>(
        "SELECT value FROM sequence WHERE name = ? AND seq_date = ?",
    )
    .bind(name)
    .bind(date)
    .fetch_optional(ex)
    .await?;
    Ok(value)
}

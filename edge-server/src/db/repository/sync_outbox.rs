//! Sync Outbox Repository
//!
//! Append-only from the edge server's side. `enqueue` runs on the caller's
//! transaction so the change record commits or rolls back with the change.

use super::RepoResult;
use shared::models::{SyncOperation, SyncOutboxEntry};
use sqlx::{SqliteConnection, SqliteExecutor};

const COLUMNS: &str =
    "id, entity_type, entity_id, operation, payload, status, retry_count, created_at, updated_at";

pub async fn enqueue(
    conn: &mut SqliteConnection,
    entity_type: &str,
    entity_id: &str,
    operation: SyncOperation,
    payload: &serde_json::Value,
    now: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO sync_outbox (entity_type, entity_id, operation, payload, status, retry_count, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, 'pending', 0, ?5, ?5) RETURNING id",
    )
    .bind(entity_type)
    .bind(entity_id)
    .bind(operation)
    .bind(payload.to_string())
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    tracing::debug!(outbox_id = id, entity_type, entity_id, ?operation, "Outbox entry appended");
    Ok(id)
}

/// All entries for one entity, oldest first
pub async fn find_by_entity<'e>(
    ex: impl SqliteExecutor<'e>,
    entity_type: &str,
    entity_id: &str,
) -> RepoResult<Vec<SyncOutboxEntry>> {
    let rows = sqlx::query_as::<_, SyncOutboxEntry>(&format!(
        "SELECT {COLUMNS} FROM sync_outbox WHERE entity_type = ? AND entity_id = ? ORDER BY id"
    ))
    .bind(entity_type)
    .bind(entity_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Pending entries in append order (what a drain agent would pick up)
pub async fn find_pending<'e>(
    ex: impl SqliteExecutor<'e>,
    limit: i64,
) -> RepoResult<Vec<SyncOutboxEntry>> {
    let rows = sqlx::query_as::<_, SyncOutboxEntry>(&format!(
        "SELECT {COLUMNS} FROM sync_outbox WHERE status = 'pending' ORDER BY id LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

//! Sync Outbox Model
//!
//! Pending change records written alongside every order mutation. The
//! edge server only appends; an external agent drains them and owns the
//! `status` / `retry_count` columns.

use serde::{Deserialize, Serialize};

/// Kind of change an outbox entry describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
}

/// Drain status of an outbox entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OutboxStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// Outbox row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SyncOutboxEntry {
    pub id: i64,
    /// `order` / `order_item`
    pub entity_type: String,
    pub entity_id: String,
    pub operation: SyncOperation,
    /// JSON snapshot of the change
    pub payload: String,
    pub status: OutboxStatus,
    pub retry_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

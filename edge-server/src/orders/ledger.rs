//! Sequence Ledger
//!
//! Per-day order numbering and the incrementally maintained daily sales
//! ledger. The `*_in` variants run on the caller's transaction and are what
//! the order store uses; the plain variants open their own transaction.

use super::error::OrderResult;
use crate::db;
use crate::db::repository::{ledger, sequence};
use crate::db::repository::ledger::LedgerDelta;
use chrono::NaiveDate;
use shared::models::DailySalesLedger;
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

use crate::utils::time::format_date;

#[derive(Clone)]
pub struct SequenceLedger {
    pool: SqlitePool,
}

impl SequenceLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Next order number for `business_date` inside an open transaction
    ///
    /// Returns 1 for the first order of a day. Concurrent callers for the
    /// same day are serialized by SQLite's write lock, so numbers are
    /// gap-free and never repeat once the transaction commits.
    pub async fn next_order_number_in(
        conn: &mut SqliteConnection,
        business_date: &str,
    ) -> OrderResult<i64> {
        Ok(sequence::next_value(conn, sequence::ORDER_NUMBER, business_date).await?)
    }

    /// Add (or, when negated, subtract) a delta to one day's ledger row
    pub async fn apply_ledger_delta_in(
        conn: &mut SqliteConnection,
        business_date: &str,
        delta: &LedgerDelta,
    ) -> OrderResult<()> {
        ledger::apply_delta(conn, business_date, delta, now_millis()).await?;
        tracing::debug!(
            business_date,
            order_count = delta.order_count,
            revenue = delta.revenue,
            "Ledger delta applied"
        );
        Ok(())
    }

    /// Allocate a number in a transaction of its own
    pub async fn next_order_number(&self, date: NaiveDate) -> OrderResult<i64> {
        let mut tx = db::begin_write(&self.pool).await?;
        let value = Self::next_order_number_in(&mut *tx, &format_date(date)).await?;
        tx.commit().await?;
        Ok(value)
    }

    pub async fn apply_ledger_delta(&self, date: NaiveDate, delta: &LedgerDelta) -> OrderResult<()> {
        let mut tx = db::begin_write(&self.pool).await?;
        Self::apply_ledger_delta_in(&mut *tx, &format_date(date), delta).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Ledger row for a day; an all-zero row when nothing was completed yet
    pub async fn ledger_for(&self, date: NaiveDate) -> OrderResult<DailySalesLedger> {
        let key = format_date(date);
        Ok(ledger::find_by_date(&self.pool, &key)
            .await?
            .unwrap_or_else(|| DailySalesLedger::empty(key)))
    }

    /// Last order number issued for a day (0 when none)
    pub async fn current_order_number(&self, date: NaiveDate) -> OrderResult<i64> {
        Ok(
            sequence::current_value(&self.pool, sequence::ORDER_NUMBER, &format_date(date))
                .await?
                .unwrap_or(0),
        )
    }
}

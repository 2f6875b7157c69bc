//! Daily Sales Ledger Repository
//!
//! Deltas are added in one UPSERT per call; a negative delta reverses an
//! earlier credit. Every column is rounded to cents after the add.

use super::RepoResult;
use shared::models::DailySalesLedger;
use sqlx::{SqliteConnection, SqliteExecutor};

/// Signed change to one ledger row
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LedgerDelta {
    pub order_count: i64,
    pub revenue: f64,
    pub tax: f64,
    pub discount: f64,
    pub cash: f64,
    pub card: f64,
    pub other: f64,
}

impl LedgerDelta {
    /// Same magnitudes, opposite sign
    pub fn negated(&self) -> Self {
        Self {
            order_count: -self.order_count,
            revenue: -self.revenue,
            tax: -self.tax,
            discount: -self.discount,
            cash: -self.cash,
            card: -self.card,
            other: -self.other,
        }
    }
}

pub async fn apply_delta(
    conn: &mut SqliteConnection,
    business_date: &str,
    delta: &LedgerDelta,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO daily_sales_ledger \
            (business_date, order_count, total_revenue, total_tax, total_discount, \
             cash_total, card_total, other_total, updated_at) \
         VALUES (?1, ?2, ROUND(?3, 2), ROUND(?4, 2), ROUND(?5, 2), ROUND(?6, 2), ROUND(?7, 2), ROUND(?8, 2), ?9) \
         ON CONFLICT(business_date) DO UPDATE SET \
            order_count    = order_count + excluded.order_count, \
            total_revenue  = ROUND(total_revenue + excluded.total_revenue, 2), \
            total_tax      = ROUND(total_tax + excluded.total_tax, 2), \
            total_discount = ROUND(total_discount + excluded.total_discount, 2), \
            cash_total     = ROUND(cash_total + excluded.cash_total, 2), \
            card_total     = ROUND(card_total + excluded.card_total, 2), \
            other_total    = ROUND(other_total + excluded.other_total, 2), \
            updated_at     = excluded.updated_at",
    )
    .bind(business_date)
    .bind(delta.order_count)
    .bind(delta.revenue)
    .bind(delta.tax)
    .bind(delta.discount)
    .bind(delta.cash)
    .bind(delta.card)
    .bind(delta.other)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find_by_date<'e>(
    ex: impl SqliteExecutor<'e>,
    business_date: &str,
) -> RepoResult<Option<DailySalesLedger>> {
    let row = sqlx::query_as::<_, DailySalesLedger>(
        "SELECT business_date, order_count, total_revenue, total_tax, total_discount, \
                cash_total, card_total, other_total, updated_at \
         FROM daily_sales_ledger WHERE business_date = ?",
    )
    .bind(business_date)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

//! Daily Sales Ledger Model (日销售台账)

use serde::{Deserialize, Serialize};

/// One row per business date, maintained incrementally on every
/// completion and on the reversal of a deleted completed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailySalesLedger {
    /// YYYY-MM-DD
    pub business_date: String,
    pub order_count: i64,
    pub total_revenue: f64,
    pub total_tax: f64,
    pub total_discount: f64,
    pub cash_total: f64,
    pub card_total: f64,
    pub other_total: f64,
    pub updated_at: i64,
}

impl DailySalesLedger {
    /// All-zero row for a date that has no completed orders yet
    pub fn empty(business_date: impl Into<String>) -> Self {
        Self {
            business_date: business_date.into(),
            order_count: 0,
            total_revenue: 0.0,
            total_tax: 0.0,
            total_discount: 0.0,
            cash_total: 0.0,
            card_total: 0.0,
            other_total: 0.0,
            updated_at: 0,
        }
    }
}

//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! (2 decimal places, half-up) for storage/serialization.

use crate::db::repository::ledger::LedgerDelta;
use rust_decimal::prelude::*;
use shared::models::{Order, OrderItemInput, PaymentMethod};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round2(value).to_f64().unwrap_or_default()
}

#[inline]
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// quantity × unit price
pub fn line_total(quantity: i32, unit_price: f64) -> Decimal {
    round2(Decimal::from(quantity) * to_decimal(unit_price))
}

/// Header amounts derived from the line items
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
}

/// subtotal = Σ line totals; tax = (subtotal − discount) × rate%;
/// total = subtotal − discount + tax
///
/// Inputs are assumed validated (discount ≤ subtotal, rate in 0..=100).
pub fn calculate_totals(items: &[OrderItemInput], discount: f64, tax_rate: f64) -> OrderTotals {
    let subtotal: Decimal = items
        .iter()
        .map(|i| line_total(i.quantity, i.unit_price))
        .sum();
    let discount = round2(to_decimal(discount));
    let taxable = (subtotal - discount).max(Decimal::ZERO);
    let tax = round2(taxable * to_decimal(tax_rate) / Decimal::ONE_HUNDRED);
    let total = taxable + tax;

    OrderTotals {
        subtotal: to_f64(subtotal),
        discount_amount: to_f64(discount),
        tax_amount: to_f64(tax),
        total_amount: to_f64(total),
    }
}

/// Ledger credit for a completed order
///
/// The whole total goes to the bucket of the order's payment method.
pub fn ledger_credit(order: &Order) -> LedgerDelta {
    let total = to_f64(to_decimal(order.total_amount));
    let (cash, card, other) = match order.payment_method {
        Some(PaymentMethod::Cash) => (total, 0.0, 0.0),
        Some(PaymentMethod::Card) => (0.0, total, 0.0),
        Some(PaymentMethod::Other) | None => (0.0, 0.0, total),
    };
    LedgerDelta {
        order_count: 1,
        revenue: total,
        tax: to_f64(to_decimal(order.tax_amount)),
        discount: to_f64(to_decimal(order.discount_amount)),
        cash,
        card,
        other,
    }
}

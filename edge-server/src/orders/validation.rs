//! Input validation for order creation
//!
//! Text limits follow the 80mm ESC/POS line width (48 chars) plus some
//! room for wrapping.

use super::error::{OrderError, OrderResult};
use shared::models::{OrderHeader, OrderItemInput, OrderType};

/// Kitchen ticket item names
pub const MAX_ITEM_NAME_LEN: usize = 64;
/// Special instructions, void reasons
pub const MAX_NOTE_LEN: usize = 500;
/// Table number, phone, customer name
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 9999;
/// Maximum line items per order
const MAX_ITEMS: usize = 500;

fn require_finite(value: f64, field: &str) -> OrderResult<()> {
    if !value.is_finite() {
        return Err(OrderError::Validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> OrderResult<()> {
    if value.trim().is_empty() {
        return Err(OrderError::Validation(format!("{field} must not be empty")));
    }
    validate_len(value, field, max_len)
}

pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> OrderResult<()> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> OrderResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(OrderError::Validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Header checks that do not depend on the items
pub fn validate_header(header: &OrderHeader) -> OrderResult<()> {
    validate_optional_text(&header.table_number, "table_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&header.customer_name, "customer_name", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&header.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;

    match header.order_type {
        OrderType::DineIn if non_blank(&header.table_number).is_none() => {
            return Err(OrderError::Validation(
                "dine_in order requires a table_number".into(),
            ));
        }
        OrderType::Delivery if non_blank(&header.customer_phone).is_none() => {
            return Err(OrderError::Validation(
                "delivery order requires a customer_phone".into(),
            ));
        }
        _ => {}
    }

    require_finite(header.discount_amount, "discount_amount")?;
    if header.discount_amount < 0.0 {
        return Err(OrderError::Validation(format!(
            "discount_amount must be non-negative, got {}",
            header.discount_amount
        )));
    }
    require_finite(header.tax_rate, "tax_rate")?;
    if !(0.0..=100.0).contains(&header.tax_rate) {
        return Err(OrderError::Validation(format!(
            "tax_rate must be between 0 and 100, got {}",
            header.tax_rate
        )));
    }
    Ok(())
}

pub fn validate_item(item: &OrderItemInput) -> OrderResult<()> {
    validate_required_text(&item.item_name, "item_name", MAX_ITEM_NAME_LEN)?;
    validate_optional_text(
        &item.special_instructions,
        "special_instructions",
        MAX_NOTE_LEN,
    )?;

    if item.quantity <= 0 {
        return Err(OrderError::Validation(format!(
            "quantity must be positive, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(OrderError::Validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {}",
            item.quantity
        )));
    }

    require_finite(item.unit_price, "unit_price")?;
    if item.unit_price < 0.0 {
        return Err(OrderError::Validation(format!(
            "unit_price must be non-negative, got {}",
            item.unit_price
        )));
    }
    if item.unit_price > MAX_PRICE {
        return Err(OrderError::Validation(format!(
            "unit_price exceeds maximum allowed ({MAX_PRICE}), got {}",
            item.unit_price
        )));
    }
    Ok(())
}

pub fn validate_items(items: &[OrderItemInput]) -> OrderResult<()> {
    if items.is_empty() {
        return Err(OrderError::Validation(
            "order must contain at least one item".into(),
        ));
    }
    if items.len() > MAX_ITEMS {
        return Err(OrderError::Validation(format!(
            "order has too many items ({}, max {MAX_ITEMS})",
            items.len()
        )));
    }
    items.iter().try_for_each(validate_item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paneer() -> OrderItemInput {
        OrderItemInput::new(101, "Paneer Tikka", 2, 180.0)
    }

    #[test]
    fn dine_in_needs_a_table() {
        let mut header = OrderHeader::new(OrderType::DineIn);
        assert!(validate_header(&header).is_err());
        header.table_number = Some("   ".into());
        assert!(validate_header(&header).is_err());
        header.table_number = Some("5".into());
        assert!(validate_header(&header).is_ok());
    }

    #[test]
    fn delivery_needs_a_phone() {
        let mut header = OrderHeader::new(OrderType::Delivery);
        assert!(validate_header(&header).is_err());
        header.customer_phone = Some("+91 98450 00000".into());
        assert!(validate_header(&header).is_ok());
        assert!(validate_header(&OrderHeader::new(OrderType::Takeaway)).is_ok());
    }

    #[test]
    fn rejects_bad_money_fields() {
        let mut header = OrderHeader::dine_in("5");
        header.tax_rate = 150.0;
        assert!(validate_header(&header).is_err());
        header.tax_rate = 5.0;
        header.discount_amount = -1.0;
        assert!(validate_header(&header).is_err());
        header.discount_amount = f64::NAN;
        assert!(validate_header(&header).is_err());
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let mut item = paneer();
        item.quantity = 0;
        assert!(matches!(validate_item(&item), Err(OrderError::Validation(_))));
        item.quantity = -3;
        assert!(validate_item(&item).is_err());
    }

    #[test]
    fn rejects_empty_item_list_and_bad_prices() {
        assert!(validate_items(&[]).is_err());

        let mut item = paneer();
        item.unit_price = f64::INFINITY;
        assert!(validate_items(&[item]).is_err());

        let mut item = paneer();
        item.item_name = " ".into();
        assert!(validate_items(&[item]).is_err());

        assert!(validate_items(&[paneer()]).is_ok());
    }
}

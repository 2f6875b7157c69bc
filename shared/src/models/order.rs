//! Order Model
//!
//! Orders and their line items as persisted by the edge server.
//! Money fields are currency units rounded to two decimals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DineIn => "dine_in",
            Self::Takeaway => "takeaway",
            Self::Delivery => "delivery",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status
///
/// `Completed` and `Cancelled` are terminal. Soft deletion is a separate
/// flag (`Order::is_deleted`) and can overlay any status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kitchen status of a single line item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum ItemStatus {
    #[default]
    Pending,
    Preparing,
    Served,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Served => "served",
        }
    }
}

/// Payment method, set when the order is completed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PaymentMethod {
    Cash,
    Card,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    /// UUID v4
    pub id: String,
    /// 当日流水号，从 1 开始
    pub order_number: i64,
    /// Business date the number belongs to (YYYY-MM-DD)
    pub business_date: String,
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub subtotal: f64,
    /// Tax rate in percent (0-100)
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub is_deleted: bool,
    pub payment_method: Option<PaymentMethod>,
    /// Operator who created the order
    pub created_by: i64,
    /// Operator of the last mutation
    pub updated_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub completed_at: Option<i64>,
}

/// Order line item row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: i64,
    /// Name captured at order time
    pub item_name: String,
    /// Drives kitchen station routing
    pub category_id: Option<i64>,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
    pub special_instructions: Option<String>,
    pub status: ItemStatus,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order with its (non-deleted) items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Command payloads
// =============================================================================

/// Order header supplied on creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHeader {
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub discount_amount: f64,
    /// Percent, 0-100
    #[serde(default)]
    pub tax_rate: f64,
}

impl OrderHeader {
    pub fn new(order_type: OrderType) -> Self {
        Self {
            order_type,
            table_number: None,
            customer_name: None,
            customer_phone: None,
            discount_amount: 0.0,
            tax_rate: 0.0,
        }
    }

    pub fn dine_in(table: impl Into<String>) -> Self {
        Self {
            table_number: Some(table.into()),
            ..Self::new(OrderType::DineIn)
        }
    }
}

/// Line item supplied on creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub menu_item_id: i64,
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub category_id: Option<i64>,
    pub special_instructions: Option<String>,
}

impl OrderItemInput {
    pub fn new(
        menu_item_id: i64,
        item_name: impl Into<String>,
        quantity: i32,
        unit_price: f64,
    ) -> Self {
        Self {
            menu_item_id,
            item_name: item_name.into(),
            quantity,
            unit_price,
            category_id: None,
            special_instructions: None,
        }
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Create order request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub header: OrderHeader,
    pub items: Vec<OrderItemInput>,
}

/// Result of a successful creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedOrder {
    pub order_id: String,
    pub order_number: i64,
    pub business_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteOrderRequest {
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateItemStatusRequest {
    pub status: ItemStatus,
}

/// Query filter for order listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    /// Business date (YYYY-MM-DD)
    pub date: Option<String>,
    pub status: Option<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&OrderType::DineIn).unwrap(),
            "\"dine_in\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"cancelled\"").unwrap(),
            OrderStatus::Cancelled
        );
        assert_eq!(
            serde_json::from_str::<ItemStatus>("\"preparing\"").unwrap(),
            ItemStatus::Preparing
        );
        assert!(serde_json::from_str::<PaymentMethod>("\"bitcoin\"").is_err());
    }

    #[test]
    fn header_money_fields_default_to_zero() {
        let header: OrderHeader =
            serde_json::from_str(r#"{"order_type":"takeaway","customer_name":"Asha"}"#).unwrap();
        assert_eq!(header.order_type, OrderType::Takeaway);
        assert_eq!(header.discount_amount, 0.0);
        assert_eq!(header.tax_rate, 0.0);
        assert!(header.table_number.is_none());
    }

    #[test]
    fn order_detail_flattens_order_fields() {
        let detail = OrderDetail {
            order: Order {
                id: "o-1".into(),
                order_number: 3,
                business_date: "2024-03-01".into(),
                order_type: OrderType::DineIn,
                table_number: Some("5".into()),
                customer_name: None,
                customer_phone: None,
                subtotal: 360.0,
                tax_rate: 0.0,
                tax_amount: 0.0,
                discount_amount: 0.0,
                total_amount: 360.0,
                status: OrderStatus::Active,
                is_deleted: false,
                payment_method: None,
                created_by: 1,
                updated_by: 1,
                created_at: 0,
                updated_at: 0,
                completed_at: None,
            },
            items: vec![],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["order_number"], 3);
        assert_eq!(json["status"], "active");
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}

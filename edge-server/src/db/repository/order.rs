//! Order Repository
//!
//! Row-level access to `orders` and `order_item`. Lifecycle rules live in
//! `orders::OrderStore`; status changes here are conditional updates whose
//! `rows_affected` tells the caller whether the precondition still held.

use super::RepoResult;
use shared::models::{ItemStatus, Order, OrderItem, OrderStatus, PaymentMethod};
use sqlx::{SqliteConnection, SqliteExecutor};

const ORDER_COLUMNS: &str = "id, order_number, business_date, order_type, table_number, \
     customer_name, customer_phone, subtotal, tax_rate, tax_amount, discount_amount, \
     total_amount, status, is_deleted, payment_method, created_by, updated_by, \
     created_at, updated_at, completed_at";

const ITEM_COLUMNS: &str = "id, order_id, menu_item_id, item_name, category_id, quantity, \
     unit_price, line_total, special_instructions, status, is_deleted, created_at, updated_at";

// =============================================================================
// Writes (transaction-bound)
// =============================================================================

pub async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, order_number, business_date, order_type, table_number, \
            customer_name, customer_phone, subtotal, tax_rate, tax_amount, discount_amount, \
            total_amount, status, is_deleted, payment_method, created_by, updated_by, \
            created_at, updated_at, completed_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
    )
    .bind(&order.id)
    .bind(order.order_number)
    .bind(&order.business_date)
    .bind(order.order_type)
    .bind(&order.table_number)
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(order.subtotal)
    .bind(order.tax_rate)
    .bind(order.tax_amount)
    .bind(order.discount_amount)
    .bind(order.total_amount)
    .bind(order.status)
    .bind(order.is_deleted)
    .bind(order.payment_method)
    .bind(order.created_by)
    .bind(order.updated_by)
    .bind(order.created_at)
    .bind(order.updated_at)
    .bind(order.completed_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_item(conn: &mut SqliteConnection, item: &OrderItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (id, order_id, menu_item_id, item_name, category_id, quantity, \
            unit_price, line_total, special_instructions, status, is_deleted, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )
    .bind(&item.id)
    .bind(&item.order_id)
    .bind(item.menu_item_id)
    .bind(&item.item_name)
    .bind(item.category_id)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(item.line_total)
    .bind(&item.special_instructions)
    .bind(item.status)
    .bind(item.is_deleted)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// active → completed; 0 rows when the order is no longer active
pub async fn mark_completed(
    conn: &mut SqliteConnection,
    id: &str,
    payment_method: PaymentMethod,
    operator_id: i64,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE orders SET status = 'completed', payment_method = ?1, completed_at = ?2, \
            updated_at = ?2, updated_by = ?3 \
         WHERE id = ?4 AND status = 'active' AND is_deleted = 0",
    )
    .bind(payment_method)
    .bind(now)
    .bind(operator_id)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

/// active → cancelled; 0 rows when the order is no longer active
pub async fn mark_cancelled(
    conn: &mut SqliteConnection,
    id: &str,
    operator_id: i64,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE orders SET status = 'cancelled', updated_at = ?1, updated_by = ?2 \
         WHERE id = ?3 AND status = 'active' AND is_deleted = 0",
    )
    .bind(now)
    .bind(operator_id)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

/// Set the soft-delete flag; 0 rows when it was already set
pub async fn mark_deleted(
    conn: &mut SqliteConnection,
    id: &str,
    operator_id: i64,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE orders SET is_deleted = 1, updated_at = ?1, updated_by = ?2 \
         WHERE id = ?3 AND is_deleted = 0",
    )
    .bind(now)
    .bind(operator_id)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn mark_items_deleted(
    conn: &mut SqliteConnection,
    order_id: &str,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE order_item SET is_deleted = 1, updated_at = ? WHERE order_id = ? AND is_deleted = 0",
    )
    .bind(now)
    .bind(order_id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn update_item_status(
    conn: &mut SqliteConnection,
    item_id: &str,
    status: ItemStatus,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE order_item SET status = ?1, updated_at = ?2 WHERE id = ?3 AND is_deleted = 0",
    )
    .bind(status)
    .bind(now)
    .bind(item_id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

// =============================================================================
// Reads
// =============================================================================

/// Order row by id, including soft-deleted rows
pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(order)
}

/// Non-deleted items of an order, in insertion order
pub async fn find_items<'e>(
    ex: impl SqliteExecutor<'e>,
    order_id: &str,
) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_item WHERE order_id = ? AND is_deleted = 0 ORDER BY rowid"
    ))
    .bind(order_id)
    .fetch_all(ex)
    .await?;
    Ok(items)
}

/// Item row by id, including soft-deleted rows
pub async fn find_item_by_id<'e>(
    ex: impl SqliteExecutor<'e>,
    item_id: &str,
) -> RepoResult<Option<OrderItem>> {
    let item = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_item WHERE id = ?"
    ))
    .bind(item_id)
    .fetch_optional(ex)
    .await?;
    Ok(item)
}

/// Active, non-deleted orders, oldest first
pub async fn find_active<'e>(ex: impl SqliteExecutor<'e>) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE status = 'active' AND is_deleted = 0 \
         ORDER BY created_at, order_number"
    ))
    .fetch_all(ex)
    .await?;
    Ok(orders)
}

/// Non-deleted orders, optionally narrowed to one business date and/or status
pub async fn find_filtered<'e>(
    ex: impl SqliteExecutor<'e>,
    business_date: Option<&str>,
    status: Option<OrderStatus>,
) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders \
         WHERE is_deleted = 0 AND (?1 IS NULL OR business_date = ?1) AND (?2 IS NULL OR status = ?2) \
         ORDER BY business_date DESC, order_number"
    ))
    .bind(business_date)
    .bind(status)
    .fetch_all(ex)
    .await?;
    Ok(orders)
}

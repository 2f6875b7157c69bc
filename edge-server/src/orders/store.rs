//! Order Store
//!
//! Lifecycle of orders and their line items on top of SQLite:
//!
//! ```text
//! active ──complete──▶ completed   (ledger credit)
//!    └────cancel─────▶ cancelled   (no ledger effect)
//! any ─────delete─────▶ is_deleted  (ledger reversal if it was completed)
//! ```
//!
//! Every mutation runs in one transaction together with its sequence,
//! ledger and outbox writes. Mutations are additionally serialized by an
//! in-process writer lock so they queue here instead of contending for
//! SQLite's write lock.

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde_json::json;
use shared::models::{
    CreatedOrder, ItemStatus, Order, OrderDetail, OrderHeader, OrderItem, OrderItemInput,
    OrderStatus, PaymentMethod, SyncOperation,
};
use shared::util::{new_id, now_millis};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use super::error::{OrderError, OrderResult};
use super::ledger::SequenceLedger;
use super::{money, validation};
use crate::db;
use crate::db::repository::{order as order_repo, sync_outbox};
use crate::utils::time::{business_date, format_date};

/// Outbox entity type for order rows
pub const ENTITY_ORDER: &str = "order";
/// Outbox entity type for order item rows
pub const ENTITY_ORDER_ITEM: &str = "order_item";

#[derive(Clone)]
pub struct OrderStore {
    pool: SqlitePool,
    ledger: SequenceLedger,
    tz: Tz,
    write_lock: Arc<Mutex<()>>,
}

impl OrderStore {
    pub fn new(pool: SqlitePool, tz: Tz) -> Self {
        Self {
            ledger: SequenceLedger::new(pool.clone()),
            pool,
            tz,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn ledger(&self) -> &SequenceLedger {
        &self.ledger
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create an active order with its items and allocate its order number
    pub async fn create_order(
        &self,
        header: OrderHeader,
        items: Vec<OrderItemInput>,
        operator_id: i64,
    ) -> OrderResult<CreatedOrder> {
        self.create_order_at(header, items, operator_id, now_millis())
            .await
    }

    /// Same as [`create_order`](Self::create_order) with an explicit
    /// creation time, which decides the business date and order number day
    #[instrument(skip(self, header, items), fields(order_type = %header.order_type, item_count = items.len()))]
    pub async fn create_order_at(
        &self,
        header: OrderHeader,
        items: Vec<OrderItemInput>,
        operator_id: i64,
        created_at: i64,
    ) -> OrderResult<CreatedOrder> {
        validation::validate_header(&header)?;
        validation::validate_items(&items)?;

        let totals = money::calculate_totals(&items, header.discount_amount, header.tax_rate);
        if money::to_decimal(header.discount_amount) > money::to_decimal(totals.subtotal) {
            return Err(OrderError::Validation(format!(
                "discount_amount {} exceeds subtotal {}",
                header.discount_amount, totals.subtotal
            )));
        }

        let date = format_date(business_date(created_at, self.tz));
        let order_id = new_id();

        let _guard = self.write_lock.lock().await;
        let mut tx = db::begin_write(&self.pool).await?;

        let order_number = SequenceLedger::next_order_number_in(&mut *tx, &date).await?;

        let order = Order {
            id: order_id.clone(),
            order_number,
            business_date: date.clone(),
            order_type: header.order_type,
            table_number: trimmed(header.table_number),
            customer_name: trimmed(header.customer_name),
            customer_phone: trimmed(header.customer_phone),
            subtotal: totals.subtotal,
            tax_rate: header.tax_rate,
            tax_amount: totals.tax_amount,
            discount_amount: totals.discount_amount,
            total_amount: totals.total_amount,
            status: OrderStatus::Active,
            is_deleted: false,
            payment_method: None,
            created_by: operator_id,
            updated_by: operator_id,
            created_at,
            updated_at: created_at,
            completed_at: None,
        };
        order_repo::insert_order(&mut *tx, &order).await?;

        let mut rows = Vec::with_capacity(items.len());
        for input in items {
            let item = OrderItem {
                id: new_id(),
                order_id: order_id.clone(),
                menu_item_id: input.menu_item_id,
                item_name: input.item_name.trim().to_string(),
                category_id: input.category_id,
                quantity: input.quantity,
                unit_price: input.unit_price,
                line_total: money::to_f64(money::line_total(input.quantity, input.unit_price)),
                special_instructions: trimmed(input.special_instructions),
                status: ItemStatus::Pending,
                is_deleted: false,
                created_at,
                updated_at: created_at,
            };
            order_repo::insert_item(&mut *tx, &item).await?;
            rows.push(item);
        }

        sync_outbox::enqueue(
            &mut *tx,
            ENTITY_ORDER,
            &order_id,
            SyncOperation::Create,
            &json!({ "order": order, "items": rows, "operator_id": operator_id }),
            created_at,
        )
        .await?;

        tx.commit().await?;

        info!(
            order_id = %order_id,
            order_number,
            business_date = %date,
            total = order.total_amount,
            operator_id,
            "Order created"
        );

        Ok(CreatedOrder {
            order_id,
            order_number,
            business_date: date,
        })
    }

    /// active → completed, crediting the ledger of the order's business date
    #[instrument(skip(self))]
    pub async fn complete_order(
        &self,
        order_id: &str,
        payment_method: PaymentMethod,
        operator_id: i64,
    ) -> OrderResult<Order> {
        let _guard = self.write_lock.lock().await;
        let mut tx = db::begin_write(&self.pool).await?;

        let current = live_order(&mut tx, order_id).await?;
        if current.status != OrderStatus::Active {
            return Err(OrderError::invalid_state(order_id, current.status, "complete"));
        }

        let now = now_millis();
        let updated =
            order_repo::mark_completed(&mut *tx, order_id, payment_method, operator_id, now)
                .await?;
        if updated == 0 {
            return Err(OrderError::invalid_state(order_id, current.status, "complete"));
        }

        let order = live_order(&mut tx, order_id).await?;
        let delta = money::ledger_credit(&order);
        SequenceLedger::apply_ledger_delta_in(&mut *tx, &order.business_date, &delta).await?;

        sync_outbox::enqueue(
            &mut *tx,
            ENTITY_ORDER,
            order_id,
            SyncOperation::Update,
            &json!({ "action": "complete", "order": order, "operator_id": operator_id }),
            now,
        )
        .await?;

        tx.commit().await?;

        info!(
            order_id,
            order_number = order.order_number,
            business_date = %order.business_date,
            total = order.total_amount,
            payment_method = %payment_method,
            "Order completed"
        );
        Ok(order)
    }

    /// active → cancelled; never touches the ledger
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &str, operator_id: i64) -> OrderResult<Order> {
        let _guard = self.write_lock.lock().await;
        let mut tx = db::begin_write(&self.pool).await?;

        let current = live_order(&mut tx, order_id).await?;
        if current.status != OrderStatus::Active {
            return Err(OrderError::invalid_state(order_id, current.status, "cancel"));
        }

        let now = now_millis();
        if order_repo::mark_cancelled(&mut *tx, order_id, operator_id, now).await? == 0 {
            return Err(OrderError::invalid_state(order_id, current.status, "cancel"));
        }
        let order = live_order(&mut tx, order_id).await?;

        sync_outbox::enqueue(
            &mut *tx,
            ENTITY_ORDER,
            order_id,
            SyncOperation::Update,
            &json!({ "action": "cancel", "order": order, "operator_id": operator_id }),
            now,
        )
        .await?;

        tx.commit().await?;

        info!(order_id, order_number = order.order_number, "Order cancelled");
        Ok(order)
    }

    /// Soft-delete an order from any status
    ///
    /// Returns `false` when the order was already deleted; that call changes
    /// nothing, so the ledger is reversed at most once.
    #[instrument(skip(self))]
    pub async fn soft_delete_order(&self, order_id: &str, operator_id: i64) -> OrderResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut tx = db::begin_write(&self.pool).await?;

        let order = order_repo::find_by_id(&mut *tx, order_id)
            .await?
            .ok_or_else(|| OrderError::order_not_found(order_id))?;
        if order.is_deleted {
            tracing::debug!(order_id, "Order already deleted, nothing to do");
            return Ok(false);
        }

        let now = now_millis();
        if order_repo::mark_deleted(&mut *tx, order_id, operator_id, now).await? == 0 {
            return Ok(false);
        }
        let items_deleted = order_repo::mark_items_deleted(&mut *tx, order_id, now).await?;

        let reversed = order.status == OrderStatus::Completed;
        if reversed {
            let delta = money::ledger_credit(&order).negated();
            SequenceLedger::apply_ledger_delta_in(&mut *tx, &order.business_date, &delta).await?;
        }

        sync_outbox::enqueue(
            &mut *tx,
            ENTITY_ORDER,
            order_id,
            SyncOperation::Delete,
            &json!({
                "order_id": order_id,
                "order_number": order.order_number,
                "business_date": order.business_date,
                "previous_status": order.status,
                "ledger_reversed": reversed,
                "operator_id": operator_id,
            }),
            now,
        )
        .await?;

        tx.commit().await?;

        info!(
            order_id,
            order_number = order.order_number,
            previous_status = %order.status,
            items_deleted,
            ledger_reversed = reversed,
            "Order soft-deleted"
        );
        Ok(true)
    }

    /// Move an item between pending / preparing / served
    #[instrument(skip(self))]
    pub async fn update_item_status(
        &self,
        item_id: &str,
        status: ItemStatus,
        operator_id: i64,
    ) -> OrderResult<OrderItem> {
        let _guard = self.write_lock.lock().await;
        let mut tx = db::begin_write(&self.pool).await?;

        let item = order_repo::find_item_by_id(&mut *tx, item_id)
            .await?
            .filter(|i| !i.is_deleted)
            .ok_or_else(|| OrderError::item_not_found(item_id))?;
        // The owning order must still exist
        match live_order(&mut tx, &item.order_id).await {
            Err(OrderError::NotFound { .. }) => return Err(OrderError::item_not_found(item_id)),
            other => other?,
        };

        let now = now_millis();
        order_repo::update_item_status(&mut *tx, item_id, status, now).await?;
        let updated = order_repo::find_item_by_id(&mut *tx, item_id)
            .await?
            .ok_or_else(|| OrderError::item_not_found(item_id))?;

        sync_outbox::enqueue(
            &mut *tx,
            ENTITY_ORDER_ITEM,
            item_id,
            SyncOperation::Update,
            &json!({
                "action": "item_status",
                "item": updated,
                "previous_status": item.status,
                "operator_id": operator_id,
            }),
            now,
        )
        .await?;

        tx.commit().await?;

        info!(
            item_id,
            order_id = %updated.order_id,
            from = item.status.as_str(),
            to = status.as_str(),
            "Item status updated"
        );
        Ok(updated)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Order with its items; `None` for unknown or soft-deleted orders
    pub async fn get_order(&self, order_id: &str) -> OrderResult<Option<OrderDetail>> {
        let Some(order) = order_repo::find_by_id(&self.pool, order_id).await? else {
            return Ok(None);
        };
        if order.is_deleted {
            return Ok(None);
        }
        let items = order_repo::find_items(&self.pool, order_id).await?;
        Ok(Some(OrderDetail { order, items }))
    }

    /// Active orders, oldest first
    pub async fn list_active_orders(&self) -> OrderResult<Vec<Order>> {
        Ok(order_repo::find_active(&self.pool).await?)
    }

    /// Non-deleted orders, newest business date first, by number within a day
    pub async fn list_orders(
        &self,
        date: Option<NaiveDate>,
        status: Option<OrderStatus>,
    ) -> OrderResult<Vec<Order>> {
        let date = date.map(format_date);
        Ok(order_repo::find_filtered(&self.pool, date.as_deref(), status).await?)
    }
}

/// Non-deleted order row inside the current transaction
async fn live_order(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    order_id: &str,
) -> OrderResult<Order> {
    order_repo::find_by_id(&mut **tx, order_id)
        .await?
        .filter(|o| !o.is_deleted)
        .ok_or_else(|| OrderError::order_not_found(order_id))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! Kitchen print service
//!
//! Command-surface entry for ticket dispatch: loads the order and a fresh
//! station snapshot, then hands both to the dispatcher.

use std::collections::HashSet;

use shared::models::{OrderDetail, OrderStatus};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use super::dispatcher::KitchenTicketDispatcher;
use super::pool::PoolStats;
use super::types::{DispatchOptions, DispatchResult};
use crate::db::repository::{RepoError, print_station};
use crate::orders::{OrderError, OrderStore};

#[derive(Debug, Error)]
pub enum PrintServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Station configuration error: {0}")]
    Stations(#[from] RepoError),
}

pub type PrintServiceResult<T> = Result<T, PrintServiceError>;

impl From<PrintServiceError> for shared::error::AppError {
    fn from(err: PrintServiceError) -> Self {
        use shared::error::AppError;
        match err {
            PrintServiceError::Validation(msg) => AppError::validation(msg),
            PrintServiceError::Order(e) => e.into(),
            PrintServiceError::Stations(e) => e.into(),
        }
    }
}

/// 厨房打印服务
#[derive(Clone)]
pub struct KitchenPrintService {
    pool: SqlitePool,
    orders: OrderStore,
    dispatcher: KitchenTicketDispatcher,
}

impl KitchenPrintService {
    pub fn new(pool: SqlitePool, orders: OrderStore, dispatcher: KitchenTicketDispatcher) -> Self {
        Self {
            pool,
            orders,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &KitchenTicketDispatcher {
        &self.dispatcher
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.dispatcher.pool_stats()
    }

    /// Print kitchen tickets for every item of an order
    ///
    /// Cancelled orders are rejected. Per-station print failures are part
    /// of the returned result, not an error.
    pub async fn dispatch_kitchen_tickets(
        &self,
        order_id: &str,
        options: DispatchOptions,
    ) -> PrintServiceResult<DispatchResult> {
        let detail = self.load_order(order_id).await?;
        if detail.order.status == OrderStatus::Cancelled {
            return Err(OrderError::invalid_state(
                order_id,
                detail.order.status,
                "print kitchen tickets",
            )
            .into());
        }

        let stations = print_station::load_station_map(&self.pool).await?;
        let result = self
            .dispatcher
            .dispatch(&detail.order, &detail.items, &stations, options)
            .await;

        info!(
            order_id = %order_id,
            printed = result.printed,
            failed = result.failures.len(),
            reprint = options.reprint,
            "Kitchen tickets dispatched"
        );
        Ok(result)
    }

    /// Print void tickets for selected items of an order
    ///
    /// Presentation only: neither the order nor its items change.
    pub async fn dispatch_void_ticket(
        &self,
        order_id: &str,
        item_ids: &[String],
        reason: &str,
    ) -> PrintServiceResult<DispatchResult> {
        if item_ids.is_empty() {
            return Err(PrintServiceError::Validation("No items to void".into()));
        }
        let detail = self.load_order(order_id).await?;

        let wanted: HashSet<&str> = item_ids.iter().map(String::as_str).collect();
        let items: Vec<_> = detail
            .items
            .iter()
            .filter(|i| wanted.contains(i.id.as_str()))
            .cloned()
            .collect();
        if let Some(missing) = wanted
            .iter()
            .find(|id| !items.iter().any(|i| i.id == **id))
        {
            return Err(OrderError::item_not_found(*missing).into());
        }

        let stations = print_station::load_station_map(&self.pool).await?;
        let result = self
            .dispatcher
            .dispatch_void(&detail.order, &items, reason, &stations)
            .await?;

        info!(
            order_id = %order_id,
            items = items.len(),
            printed = result.printed,
            failed = result.failures.len(),
            "Void tickets dispatched"
        );
        Ok(result)
    }

    async fn load_order(&self, order_id: &str) -> PrintServiceResult<OrderDetail> {
        self.orders
            .get_order(order_id)
            .await?
            .ok_or_else(|| OrderError::order_not_found(order_id).into())
    }
}

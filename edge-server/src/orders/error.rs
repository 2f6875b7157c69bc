//! Order errors
//!
//! Four failure kinds reach callers of the order store: bad input,
//! unknown (or soft-deleted) rows, lifecycle violations and store
//! failures. A failed transaction is always rolled back, so every kind
//! leaves no partial state behind.

use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    /// Rejected before anything was written
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Transition not permitted from the current status
    #[error("Order {order_id} is {status}, cannot {operation}")]
    InvalidState {
        order_id: String,
        status: OrderStatus,
        operation: &'static str,
    },

    /// Store transaction failed and was rolled back
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl OrderError {
    pub fn order_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "order",
            id: id.into(),
        }
    }

    pub fn item_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "order_item",
            id: id.into(),
        }
    }

    pub fn invalid_state(
        order_id: impl Into<String>,
        status: OrderStatus,
        operation: &'static str,
    ) -> Self {
        Self::InvalidState {
            order_id: order_id.into(),
            status,
            operation,
        }
    }
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(msg) => OrderError::Validation(msg),
            RepoError::NotFound(msg) => OrderError::NotFound {
                entity: "record",
                id: msg,
            },
            RepoError::Duplicate(msg) | RepoError::Database(msg) => OrderError::Persistence(msg),
        }
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Persistence(err.to_string())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::Validation(_) => AppError::with_message(ErrorCode::ValidationFailed, message),
            OrderError::NotFound { entity, id } => {
                let code = match entity {
                    "order" => ErrorCode::OrderNotFound,
                    "order_item" => ErrorCode::OrderItemNotFound,
                    _ => ErrorCode::NotFound,
                };
                AppError::with_message(code, message).with_detail("id", id)
            }
            OrderError::InvalidState {
                order_id, status, ..
            } => {
                let code = match status {
                    OrderStatus::Completed => ErrorCode::OrderAlreadyCompleted,
                    OrderStatus::Cancelled => ErrorCode::OrderAlreadyCancelled,
                    OrderStatus::Active => ErrorCode::OrderInvalidState,
                };
                AppError::with_message(code, message)
                    .with_detail("order_id", order_id)
                    .with_detail("status", status.as_str())
            }
            OrderError::Persistence(_) => AppError::with_message(ErrorCode::DatabaseError, message),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_maps_to_conflict_codes() {
        let err: AppError =
            OrderError::invalid_state("o-1", OrderStatus::Completed, "complete").into();
        assert_eq!(err.code, ErrorCode::OrderAlreadyCompleted);
        assert_eq!(err.message, "Order o-1 is completed, cannot complete");

        let err: AppError =
            OrderError::invalid_state("o-2", OrderStatus::Cancelled, "cancel").into();
        assert_eq!(err.code, ErrorCode::OrderAlreadyCancelled);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_distinguishes_orders_and_items() {
        let err: AppError = OrderError::order_not_found("o-9").into();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        let err: AppError = OrderError::item_not_found("i-9").into();
        assert_eq!(err.code, ErrorCode::OrderItemNotFound);
    }

    #[test]
    fn repo_errors_become_persistence_or_validation() {
        assert!(matches!(
            OrderError::from(RepoError::Database("disk I/O error".into())),
            OrderError::Persistence(_)
        ));
        assert!(matches!(
            OrderError::from(RepoError::Validation("bad".into())),
            OrderError::Validation(_)
        ));
        let err: AppError = OrderError::Persistence("locked".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}

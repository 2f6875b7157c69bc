//! Order API Module
//!
//! Order lifecycle commands. Every mutation requires [`CurrentOperator`].
//!
//! [`CurrentOperator`]: crate::auth::CurrentOperator

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(handler::list).post(handler::create))
        .route("/api/orders/active", get(handler::list_active))
        .route(
            "/api/orders/{id}",
            get(handler::get_by_id).delete(handler::delete),
        )
        .route("/api/orders/{id}/complete", post(handler::complete))
        .route("/api/orders/{id}/cancel", post(handler::cancel))
        .route("/api/order-items/{id}/status", put(handler::update_item_status))
}

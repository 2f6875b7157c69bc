//! Kitchen Ticket API Module
//!
//! Dispatch of kitchen, reprint and void tickets for an order. Per-station
//! print failures come back inside the `DispatchResult` with status 200.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders/{id}/kitchen-tickets", post(handler::dispatch))
        .route("/api/orders/{id}/void-ticket", post(handler::dispatch_void))
}

//! Print Station API Module
//!
//! Kitchen stations and the category → station mapping used for ticket
//! routing. Changes apply to the next dispatch.

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/print-stations",
            get(handler::list).post(handler::create),
        )
        .route("/api/print-stations/{id}/active", put(handler::set_active))
        .route("/api/station-mappings", get(handler::list_mappings))
        .route(
            "/api/station-mappings/{category_id}",
            put(handler::set_mapping).delete(handler::remove_mapping),
        )
}

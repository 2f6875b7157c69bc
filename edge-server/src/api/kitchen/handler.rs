//! Kitchen Ticket API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentOperator;
use crate::core::ServerState;
use crate::printing::{DispatchOptions, DispatchResult, VoidTicketRequest};
use crate::utils::AppResult;

/// POST /api/orders/{id}/kitchen-tickets - 打印厨房单
///
/// Body: `{"attach_bill": bool, "reprint": bool, "urgent": bool}`, every field
/// optional. A request without a JSON body prints with the defaults.
pub async fn dispatch(
    State(state): State<ServerState>,
    operator: CurrentOperator,
    Path(id): Path<String>,
    options: Option<Json<DispatchOptions>>,
) -> AppResult<Json<DispatchResult>> {
    let options = options.map(|Json(o)| o).unwrap_or_default();
    tracing::debug!(order_id = %id, operator_id = operator.id, ?options, "Kitchen ticket request");
    let result = state
        .kitchen_print_service()
        .dispatch_kitchen_tickets(&id, options)
        .await?;
    Ok(Json(result))
}

/// POST /api/orders/{id}/void-ticket - 打印退菜单
pub async fn dispatch_void(
    State(state): State<ServerState>,
    operator: CurrentOperator,
    Path(id): Path<String>,
    Json(payload): Json<VoidTicketRequest>,
) -> AppResult<Json<DispatchResult>> {
    tracing::debug!(order_id = %id, operator_id = operator.id, items = payload.item_ids.len(), "Void ticket request");
    let result = state
        .kitchen_print_service()
        .dispatch_void_ticket(&id, &payload.item_ids, &payload.reason)
        .await?;
    Ok(Json(result))
}

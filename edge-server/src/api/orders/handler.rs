//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;

use crate::auth::CurrentOperator;
use crate::core::ServerState;
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult};
use shared::error::ErrorCode;
use shared::models::{
    CompleteOrderRequest, CreateOrderRequest, CreatedOrder, Order, OrderDetail, OrderItem,
    OrderListQuery, UpdateItemStatusRequest,
};

#[derive(Debug, Serialize)]
pub struct DeleteOrderResponse {
    pub order_id: String,
    /// false when the order was already deleted
    pub deleted: bool,
}

/// POST /api/orders - 创建订单
pub async fn create(
    State(state): State<ServerState>,
    operator: CurrentOperator,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<CreatedOrder>> {
    let created = state
        .orders
        .create_order(payload.header, payload.items, operator.id)
        .await?;
    Ok(Json(created))
}

/// GET /api/orders?date=YYYY-MM-DD&status=completed - 订单列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let date = query.date.as_deref().map(parse_date).transpose()?;
    let orders = state.orders.list_orders(date, query.status).await?;
    Ok(Json(orders))
}

/// GET /api/orders/active - 进行中的订单
pub async fn list_active(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_active_orders().await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - 订单详情 (含菜品)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let detail = state.orders.get_order(&id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
    })?;
    Ok(Json(detail))
}

/// POST /api/orders/{id}/complete - 结账
pub async fn complete(
    State(state): State<ServerState>,
    operator: CurrentOperator,
    Path(id): Path<String>,
    Json(payload): Json<CompleteOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .complete_order(&id, payload.payment_method, operator.id)
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/cancel - 取消订单
pub async fn cancel(
    State(state): State<ServerState>,
    operator: CurrentOperator,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.cancel_order(&id, operator.id).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/{id} - 软删除 (重复调用无副作用)
pub async fn delete(
    State(state): State<ServerState>,
    operator: CurrentOperator,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteOrderResponse>> {
    let deleted = state.orders.soft_delete_order(&id, operator.id).await?;
    Ok(Json(DeleteOrderResponse {
        order_id: id,
        deleted,
    }))
}

/// PUT /api/order-items/{id}/status - 更新菜品出餐状态
pub async fn update_item_status(
    State(state): State<ServerState>,
    operator: CurrentOperator,
    Path(id): Path<String>,
    Json(payload): Json<UpdateItemStatusRequest>,
) -> AppResult<Json<OrderItem>> {
    let item = state
        .orders
        .update_item_status(&id, payload.status, operator.id)
        .await?;
    Ok(Json(item))
}

//! Print Station API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentOperator;
use crate::core::ServerState;
use crate::db::repository::{RepoError, print_station};
use crate::utils::{AppError, AppResult};
use shared::error::ErrorCode;
use shared::models::{PrinterStation, PrinterStationCreate, StationMapping};

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetMappingRequest {
    pub station_id: i64,
}

#[derive(Debug, Serialize)]
pub struct RemoveMappingResponse {
    pub category_id: i64,
    pub removed: bool,
}

fn station_error(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::PrintStationNotFound, msg),
        RepoError::Duplicate(_) => AppError::new(ErrorCode::PrintStationNameExists),
        other => other.into(),
    }
}

/// GET /api/print-stations - 所有厨房站点
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<PrinterStation>>> {
    let stations = print_station::find_all_stations(&state.pool).await?;
    Ok(Json(stations))
}

/// POST /api/print-stations - 创建站点
pub async fn create(
    State(state): State<ServerState>,
    operator: CurrentOperator,
    Json(payload): Json<PrinterStationCreate>,
) -> AppResult<Json<PrinterStation>> {
    let station = print_station::create_station(&state.pool, payload)
        .await
        .map_err(station_error)?;
    tracing::info!(station_id = station.id, name = %station.name, operator_id = operator.id, "Print station created");
    Ok(Json(station))
}

/// PUT /api/print-stations/{id}/active - 启用/停用站点
pub async fn set_active(
    State(state): State<ServerState>,
    operator: CurrentOperator,
    Path(id): Path<i64>,
    Json(payload): Json<SetActiveRequest>,
) -> AppResult<Json<PrinterStation>> {
    print_station::set_station_active(&state.pool, id, payload.is_active)
        .await
        .map_err(station_error)?;
    let station = print_station::find_station(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PrintStationNotFound))?;
    tracing::info!(station_id = id, is_active = payload.is_active, operator_id = operator.id, "Print station toggled");
    Ok(Json(station))
}

/// GET /api/station-mappings - 分类 → 站点映射
pub async fn list_mappings(State(state): State<ServerState>) -> AppResult<Json<Vec<StationMapping>>> {
    let mappings = print_station::find_all_mappings(&state.pool).await?;
    Ok(Json(mappings))
}

/// PUT /api/station-mappings/{category_id} - 设置分类的站点 (覆盖旧映射)
pub async fn set_mapping(
    State(state): State<ServerState>,
    operator: CurrentOperator,
    Path(category_id): Path<i64>,
    Json(payload): Json<SetMappingRequest>,
) -> AppResult<Json<StationMapping>> {
    print_station::set_mapping(&state.pool, category_id, payload.station_id)
        .await
        .map_err(station_error)?;
    tracing::info!(category_id, station_id = payload.station_id, operator_id = operator.id, "Station mapping set");
    Ok(Json(StationMapping {
        category_id,
        station_id: payload.station_id,
    }))
}

/// DELETE /api/station-mappings/{category_id} - 删除映射 (回落到默认打印机)
pub async fn remove_mapping(
    State(state): State<ServerState>,
    operator: CurrentOperator,
    Path(category_id): Path<i64>,
) -> AppResult<Json<RemoveMappingResponse>> {
    let removed = print_station::remove_mapping(&state.pool, category_id).await?;
    tracing::info!(category_id, removed, operator_id = operator.id, "Station mapping removed");
    Ok(Json(RemoveMappingResponse {
        category_id,
        removed,
    }))
}

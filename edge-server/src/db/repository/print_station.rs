//! Print Station Repository
//!
//! Kitchen stations and the category → station mapping. The mapping is
//! maintained by back-office configuration; order flow only reads it via
//! [`load_station_map`].

use super::{RepoError, RepoResult};
use crate::printing::StationMap;
use shared::models::{PrinterStation, PrinterStationCreate, StationMapping};
use sqlx::SqlitePool;

pub async fn find_all_stations(pool: &SqlitePool) -> RepoResult<Vec<PrinterStation>> {
    let stations = sqlx::query_as::<_, PrinterStation>(
        "SELECT id, name, printer_target, is_active, created_at FROM printer_station ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(stations)
}

pub async fn find_station(pool: &SqlitePool, id: i64) -> RepoResult<Option<PrinterStation>> {
    let station = sqlx::query_as::<_, PrinterStation>(
        "SELECT id, name, printer_target, is_active, created_at FROM printer_station WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(station)
}

pub async fn create_station(
    pool: &SqlitePool,
    data: PrinterStationCreate,
) -> RepoResult<PrinterStation> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err(RepoError::Validation("Station name must not be empty".into()));
    }
    if data.printer_target.trim().is_empty() {
        return Err(RepoError::Validation("Printer target must not be empty".into()));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO printer_station (name, printer_target, is_active, created_at) \
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(data.printer_target.trim())
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .fetch_one(pool)
    .await?;

    find_station(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create print station".into()))
}

pub async fn set_station_active(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE printer_station SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Print station {id} not found")));
    }
    Ok(())
}

pub async fn find_all_mappings(pool: &SqlitePool) -> RepoResult<Vec<StationMapping>> {
    let rows = sqlx::query_as::<_, StationMapping>(
        "SELECT category_id, station_id FROM station_mapping ORDER BY category_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Map a category to a station, replacing any previous mapping
pub async fn set_mapping(pool: &SqlitePool, category_id: i64, station_id: i64) -> RepoResult<()> {
    if find_station(pool, station_id).await?.is_none() {
        return Err(RepoError::NotFound(format!(
            "Print station {station_id} not found"
        )));
    }
    sqlx::query(
        "INSERT INTO station_mapping (category_id, station_id) VALUES (?1, ?2) \
         ON CONFLICT(category_id) DO UPDATE SET station_id = excluded.station_id",
    )
    .bind(category_id)
    .bind(station_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns false when the category had no mapping
pub async fn remove_mapping(pool: &SqlitePool, category_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM station_mapping WHERE category_id = ?")
        .bind(category_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Snapshot of stations and mappings used for one routing decision
pub async fn load_station_map(pool: &SqlitePool) -> RepoResult<StationMap> {
    let stations = find_all_stations(pool).await?;
    let mappings = find_all_mappings(pool).await?;
    Ok(StationMap::new(stations, mappings))
}

//! Daily Sales Ledger API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/ledger/{date} | GET | 某营业日的销售账本 (无记录时全为 0) |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::time::parse_date;
use shared::models::DailySalesLedger;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/ledger/{date}", get(get_by_date))
}

/// GET /api/ledger/{date}
pub async fn get_by_date(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<DailySalesLedger>> {
    let date = parse_date(&date)?;
    let ledger = state.orders.ledger().ledger_for(date).await?;
    Ok(Json(ledger))
}

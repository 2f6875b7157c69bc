//! Kitchen Print Station Model

use serde::{Deserialize, Serialize};

/// Kitchen station with its own printer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PrinterStation {
    pub id: i64,
    pub name: String,
    /// Printer address, `host:port` for network printers
    pub printer_target: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// Category → station mapping row (one station per category)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StationMapping {
    pub category_id: i64,
    pub station_id: i64,
}

/// Create print station payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterStationCreate {
    pub name: String,
    pub printer_target: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

//! Kitchen printing types

use serde::{Deserialize, Serialize};
use std::fmt;

/// 打印目标站点
///
/// `Default` 是未映射分类的兜底厨房打印机。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum StationKey {
    Station(i64),
    Default,
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationKey::Station(id) => write!(f, "station:{}", id),
            StationKey::Default => f.write_str("default"),
        }
    }
}

/// Ticket variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketKind {
    /// Normal preparation ticket
    Kitchen,
    /// Items struck through, with a mandatory reason
    Void { reason: String },
}

/// Dispatch options (来自前端的打印请求)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchOptions {
    /// Attach a condensed bill to each ticket
    pub attach_bill: bool,
    /// 补打: presentation marker only
    pub reprint: bool,
    pub urgent: bool,
}

impl DispatchOptions {
    pub fn with_bill() -> Self {
        Self {
            attach_bill: true,
            ..Self::default()
        }
    }

    pub fn reprint() -> Self {
        Self {
            reprint: true,
            ..Self::default()
        }
    }
}

/// One station that could not be printed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationFailure {
    pub station: StationKey,
    pub station_name: String,
    pub message: String,
}

/// Aggregated outcome of one dispatch
///
/// Only meaningful once every job has settled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub order_id: String,
    /// Number of station jobs scheduled
    pub jobs: usize,
    /// Stations printed successfully
    pub printed: usize,
    pub failures: Vec<StationFailure>,
}

impl DispatchResult {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure for the given station, if it failed
    pub fn failure_for(&self, station: StationKey) -> Option<&StationFailure> {
        self.failures.iter().find(|f| f.station == station)
    }
}

/// Void ticket request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoidTicketRequest {
    pub item_ids: Vec<String>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_key_display_and_order() {
        assert_eq!(StationKey::Station(7).to_string(), "station:7");
        assert_eq!(StationKey::Default.to_string(), "default");
        assert!(StationKey::Station(99) < StationKey::Default);
    }

    #[test]
    fn test_dispatch_options_default_from_empty_json() {
        let opts: DispatchOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, DispatchOptions::default());

        let opts: DispatchOptions = serde_json::from_str(r#"{"attach_bill":true}"#).unwrap();
        assert!(opts.attach_bill);
        assert!(!opts.reprint);
    }

    #[test]
    fn test_failure_lookup() {
        let result = DispatchResult {
            order_id: "o1".into(),
            jobs: 2,
            printed: 1,
            failures: vec![StationFailure {
                station: StationKey::Station(2),
                station_name: "Bar".into(),
                message: "offline".into(),
            }],
        };
        assert!(!result.is_complete());
        assert_eq!(result.failure_for(StationKey::Station(2)).unwrap().station_name, "Bar");
        assert!(result.failure_for(StationKey::Default).is_none());
    }
}

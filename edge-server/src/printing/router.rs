//! Station Router
//!
//! 按分类 → 厨房站点映射对订单菜品分组。映射缺失不是错误：
//! 未映射的菜品走默认厨房打印机。

use std::collections::{BTreeMap, HashMap};

use shared::models::{OrderItem, PrinterStation, StationMapping};

use super::types::StationKey;

/// Snapshot of the station configuration used for one routing decision
///
/// Only active stations are kept; a category mapped to an inactive or
/// unknown station is treated as unmapped.
#[derive(Debug, Clone, Default)]
pub struct StationMap {
    stations: HashMap<i64, PrinterStation>,
    category_to_station: HashMap<i64, i64>,
}

/// Items grouped by destination
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub by_station: BTreeMap<i64, Vec<OrderItem>>,
    pub unmapped: Vec<OrderItem>,
}

impl Partition {
    pub fn is_empty(&self) -> bool {
        self.by_station.is_empty() && self.unmapped.is_empty()
    }

    /// Number of print jobs this partition produces
    pub fn job_count(&self) -> usize {
        self.by_station.len() + usize::from(!self.unmapped.is_empty())
    }

    /// Non-empty buckets in dispatch order: stations by id, then default
    pub fn into_jobs(self) -> Vec<(StationKey, Vec<OrderItem>)> {
        let mut jobs: Vec<_> = self
            .by_station
            .into_iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(id, items)| (StationKey::Station(id), items))
            .collect();
        if !self.unmapped.is_empty() {
            jobs.push((StationKey::Default, self.unmapped));
        }
        jobs
    }
}

impl StationMap {
    pub fn new(stations: Vec<PrinterStation>, mappings: Vec<StationMapping>) -> Self {
        let stations: HashMap<i64, PrinterStation> = stations
            .into_iter()
            .filter(|s| s.is_active)
            .map(|s| (s.id, s))
            .collect();

        let category_to_station = mappings
            .into_iter()
            .filter(|m| stations.contains_key(&m.station_id))
            .map(|m| (m.category_id, m.station_id))
            .collect();

        Self {
            stations,
            category_to_station,
        }
    }

    pub fn station(&self, id: i64) -> Option<&PrinterStation> {
        self.stations.get(&id)
    }

    /// Station for a category, `None` routes to the default printer
    pub fn station_for_category(&self, category_id: Option<i64>) -> Option<i64> {
        category_id.and_then(|c| self.category_to_station.get(&c).copied())
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Group items by station, preserving item order inside each bucket
    pub fn partition(&self, items: &[OrderItem]) -> Partition {
        let mut partition = Partition::default();
        for item in items {
            match self.station_for_category(item.category_id) {
                Some(station_id) => partition
                    .by_station
                    .entry(station_id)
                    .or_default()
                    .push(item.clone()),
                None => partition.unmapped.push(item.clone()),
            }
        }
        partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ItemStatus;

    fn station(id: i64, name: &str, active: bool) -> PrinterStation {
        PrinterStation {
            id,
            name: name.into(),
            printer_target: format!("10.0.0.{}:9100", id),
            is_active: active,
            created_at: 0,
        }
    }

    fn item(id: &str, category_id: Option<i64>) -> OrderItem {
        OrderItem {
            id: id.into(),
            order_id: "o1".into(),
            menu_item_id: 1,
            item_name: id.into(),
            category_id,
            quantity: 1,
            unit_price: 10.0,
            line_total: 10.0,
            special_instructions: None,
            status: ItemStatus::Pending,
            is_deleted: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn map(pairs: &[(i64, i64)]) -> Vec<StationMapping> {
        pairs
            .iter()
            .map(|&(category_id, station_id)| StationMapping {
                category_id,
                station_id,
            })
            .collect()
    }

    #[test]
    fn test_partition_three_way() {
        let map = StationMap::new(
            vec![station(1, "Grill", true), station(2, "Bar", true)],
            map(&[(10, 1), (20, 2)]),
        );
        let items = vec![
            item("a", Some(10)),
            item("b", Some(20)),
            item("c", Some(30)),
            item("d", Some(10)),
        ];

        let partition = map.partition(&items);
        assert_eq!(partition.job_count(), 3);
        let grill: Vec<_> = partition.by_station[&1].iter().map(|i| i.id.as_str()).collect();
        assert_eq!(grill, vec!["a", "d"]);
        assert_eq!(partition.by_station[&2].len(), 1);
        assert_eq!(partition.unmapped.len(), 1);
        assert_eq!(partition.unmapped[0].id, "c");
    }

    #[test]
    fn test_partition_is_deterministic() {
        let map = StationMap::new(
            vec![station(3, "Dessert", true), station(1, "Grill", true)],
            map(&[(10, 3), (20, 1)]),
        );
        let items = vec![item("a", Some(10)), item("b", Some(20)), item("c", None)];

        let first = map.partition(&items);
        let second = map.partition(&items);
        assert_eq!(first, second);

        let keys: Vec<_> = first.into_jobs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![StationKey::Station(1), StationKey::Station(3), StationKey::Default]
        );
    }

    #[test]
    fn test_inactive_station_routes_to_default() {
        let map = StationMap::new(
            vec![station(1, "Grill", false)],
            map(&[(10, 1)]),
        );
        assert_eq!(map.station_count(), 0);
        assert_eq!(map.station_for_category(Some(10)), None);

        let partition = map.partition(&[item("a", Some(10))]);
        assert!(partition.by_station.is_empty());
        assert_eq!(partition.unmapped.len(), 1);
    }

    #[test]
    fn test_no_category_and_empty_input() {
        let map = StationMap::new(vec![station(1, "Grill", true)], map(&[(10, 1)]));
        assert_eq!(map.station_for_category(None), None);

        let partition = map.partition(&[]);
        assert!(partition.is_empty());
        assert_eq!(partition.job_count(), 0);
        assert!(partition.into_jobs().is_empty());
    }
}

//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use crab_printer::PrintError;
use edge_server::db::DbService;
use edge_server::db::repository::print_station;
use edge_server::printing::PrintCapability;
use edge_server::utils::time::date_hms_to_millis;
use edge_server::{Config, OrderStore, ServerState};
use parking_lot::Mutex;
use shared::models::{OrderHeader, OrderItemInput, PrinterStation, PrinterStationCreate};
use sqlx::SqlitePool;

pub const TZ: chrono_tz::Tz = chrono_tz::Asia::Kolkata;
pub const OPERATOR: i64 = 7;
pub const DEFAULT_PRINTER: &str = "default-printer";

pub async fn memory_pool() -> SqlitePool {
    DbService::open_in_memory().await.unwrap().pool
}

pub async fn memory_store() -> (OrderStore, SqlitePool) {
    let pool = memory_pool().await;
    (OrderStore::new(pool.clone(), TZ), pool)
}

pub fn test_config() -> Config {
    let mut config = Config::with_overrides("/tmp/crab-edge-test", 0);
    config.timezone = TZ;
    config.print_pool_size = 3;
    config.print_job_timeout_ms = 200;
    config.paper_width = 48;
    config.default_kitchen_printer = DEFAULT_PRINTER.into();
    config.max_connections = 64;
    config
}

pub async fn test_state(printer: Arc<FakePrinter>) -> ServerState {
    ServerState::new(test_config(), memory_pool().await, printer)
}

/// Millis for a wall-clock time in the business timezone
pub fn at(y: i32, m: u32, d: u32, hour: u32) -> i64 {
    let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
    date_hms_to_millis(date, hour, 0, 0, TZ)
}

pub fn paneer_tikka() -> OrderItemInput {
    OrderItemInput::new(101, "Paneer Tikka", 2, 180.0).in_category(1)
}

pub fn mango_lassi() -> OrderItemInput {
    OrderItemInput::new(201, "Mango Lassi", 1, 90.0).in_category(2)
}

pub fn gulab_jamun() -> OrderItemInput {
    OrderItemInput::new(301, "Gulab Jamun", 3, 40.0).in_category(3)
}

pub fn table(n: &str) -> OrderHeader {
    OrderHeader::dine_in(n)
}

/// Grill (category 1) and Bar (category 2); category 3 stays unmapped
pub async fn seed_stations(pool: &SqlitePool) -> (PrinterStation, PrinterStation) {
    let grill = print_station::create_station(
        pool,
        PrinterStationCreate {
            name: "Grill".into(),
            printer_target: "grill-printer".into(),
            is_active: true,
        },
    )
    .await
    .unwrap();
    let bar = print_station::create_station(
        pool,
        PrinterStationCreate {
            name: "Bar".into(),
            printer_target: "bar-printer".into(),
            is_active: true,
        },
    )
    .await
    .unwrap();
    print_station::set_mapping(pool, 1, grill.id).await.unwrap();
    print_station::set_mapping(pool, 2, bar.id).await.unwrap();
    (grill, bar)
}

/// Print capability double: records documents, fails or hangs on demand
#[derive(Default)]
pub struct FakePrinter {
    failing: Mutex<HashSet<String>>,
    hanging: Mutex<HashSet<String>>,
    submitted: Mutex<Vec<(String, Vec<u8>)>>,
}

impl FakePrinter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, target: &str) {
        self.failing.lock().insert(target.to_string());
    }

    pub fn hang(&self, target: &str) {
        self.hanging.lock().insert(target.to_string());
    }

    pub fn heal(&self, target: &str) {
        self.failing.lock().remove(target);
        self.hanging.lock().remove(target);
    }

    /// Targets that received a document, sorted
    pub fn targets(&self) -> Vec<String> {
        let mut t: Vec<_> = self.submitted.lock().iter().map(|(t, _)| t.clone()).collect();
        t.sort();
        t
    }

    /// Documents sent to `target`, lossily decoded for assertions
    pub fn documents_for(&self, target: &str) -> Vec<String> {
        self.submitted
            .lock()
            .iter()
            .filter(|(t, _)| t == target)
            .map(|(_, d)| String::from_utf8_lossy(d).into_owned())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.submitted.lock().len()
    }
}

#[async_trait]
impl PrintCapability for FakePrinter {
    async fn submit(&self, document: &[u8], target: &str) -> Result<(), PrintError> {
        let hang = self.hanging.lock().contains(target);
        if hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        let fail = self.failing.lock().contains(target);
        if fail {
            return Err(PrintError::Connection(format!("{}: connection refused", target)));
        }
        self.submitted
            .lock()
            .push((target.to_string(), document.to_vec()));
        Ok(())
    }
}

//! Data models
//!
//! Shared between edge-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Orders and items use UUID string ids; stations and categories use `i64`.

pub mod daily_ledger;
pub mod order;
pub mod print_station;
pub mod sync;

// Re-exports
pub use daily_ledger::*;
pub use order::*;
pub use print_station::*;
pub use sync::*;

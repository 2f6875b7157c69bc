//! Kitchen ticket printing
//!
//! - **router**: category → station partition of order items
//! - **pool**: reusable print surfaces (advisory, never blocks)
//! - **renderer**: ESC/POS layout of kitchen, void and reprint tickets
//! - **capability**: submission of rendered documents to printers
//! - **dispatcher**: concurrent per-station jobs with failure isolation
//! - **service**: order lookup + dispatch, used by the HTTP layer
//!
//! ```text
//! order ─▶ StationMap::partition ─┬─▶ job(A) ─▶ acquire ─▶ render ─▶ submit ─▶ release
//!                                 ├─▶ job(B) ─▶ ...
//!                                 └─▶ job(default) ─▶ ...
//!                                          join_all ─▶ DispatchResult
//! ```

pub mod capability;
pub mod dispatcher;
pub mod pool;
pub mod renderer;
pub mod router;
pub mod service;
pub mod types;

pub use capability::{NetworkPrintCapability, PrintCapability};
pub use dispatcher::{DEFAULT_STATION_NAME, KitchenTicketDispatcher, PrintJobError};
pub use pool::{PoolStats, PooledSurface, PrintSurface, PrintSurfacePool};
pub use renderer::{KitchenTicketRenderer, Ticket};
pub use router::{Partition, StationMap};
pub use service::{KitchenPrintService, PrintServiceError, PrintServiceResult};
pub use types::*;

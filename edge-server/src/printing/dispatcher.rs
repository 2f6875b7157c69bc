//! Kitchen Ticket Dispatcher
//!
//! Fans an order out to its kitchen stations: one job per non-empty
//! station bucket plus one for unmapped items on the default printer.
//! Jobs run as independent tasks, each with its own pooled surface and
//! timeout. A failed or hung job is recorded against its station and never
//! affects siblings. No automatic retry.

use std::sync::Arc;
use std::time::Duration;

use crab_printer::PrintError;
use futures::future::join_all;
use shared::models::{Order, OrderItem};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use super::capability::PrintCapability;
use super::pool::{PoolStats, PrintSurfacePool};
use super::renderer::{KitchenTicketRenderer, Ticket};
use super::router::StationMap;
use super::service::{PrintServiceError, PrintServiceResult};
use super::types::{DispatchOptions, DispatchResult, StationFailure, StationKey, TicketKind};

/// Display name of the fallback destination
pub const DEFAULT_STATION_NAME: &str = "Kitchen";

/// Failure of a single station job
#[derive(Debug, Error)]
pub enum PrintJobError {
    #[error(transparent)]
    Printer(#[from] PrintError),

    #[error("Print job timed out after {0} ms")]
    Timeout(u128),

    #[error("Print job aborted: {0}")]
    Aborted(String),
}

/// Everything a job task owns
struct StationJob {
    key: StationKey,
    station_name: String,
    target: String,
    items: Vec<OrderItem>,
}

/// Shared, read-only inputs of one dispatch
struct DispatchInput {
    order: Order,
    bill_items: Vec<OrderItem>,
    kind: TicketKind,
    options: DispatchOptions,
}

/// 厨房单分发器
#[derive(Clone)]
pub struct KitchenTicketDispatcher {
    pool: PrintSurfacePool,
    capability: Arc<dyn PrintCapability>,
    renderer: KitchenTicketRenderer,
    default_printer: String,
    job_timeout: Duration,
}

impl KitchenTicketDispatcher {
    pub fn new(
        pool: PrintSurfacePool,
        capability: Arc<dyn PrintCapability>,
        renderer: KitchenTicketRenderer,
        default_printer: impl Into<String>,
        job_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            capability,
            renderer,
            default_printer: default_printer.into(),
            job_timeout,
        }
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Print kitchen tickets for `items`, one per station
    ///
    /// Reprints go through here too with `options.reprint` set; printing
    /// never touches order, stock or ledger state.
    #[instrument(skip_all, fields(order_id = %order.id, order_number = order.order_number))]
    pub async fn dispatch(
        &self,
        order: &Order,
        items: &[OrderItem],
        stations: &StationMap,
        options: DispatchOptions,
    ) -> DispatchResult {
        self.fan_out(order, items, items, stations, TicketKind::Kitchen, options)
            .await
    }

    /// Print void tickets for the given items
    ///
    /// Items are struck through and carry `reason`, which must not be empty.
    #[instrument(skip_all, fields(order_id = %order.id, order_number = order.order_number))]
    pub async fn dispatch_void(
        &self,
        order: &Order,
        items: &[OrderItem],
        reason: &str,
        stations: &StationMap,
    ) -> PrintServiceResult<DispatchResult> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(PrintServiceError::Validation("Void reason is required".into()));
        }
        if items.is_empty() {
            return Err(PrintServiceError::Validation("No items to void".into()));
        }
        let kind = TicketKind::Void {
            reason: reason.to_string(),
        };
        Ok(self
            .fan_out(order, items, &[], stations, kind, DispatchOptions::default())
            .await)
    }

    async fn fan_out(
        &self,
        order: &Order,
        items: &[OrderItem],
        bill_items: &[OrderItem],
        stations: &StationMap,
        kind: TicketKind,
        options: DispatchOptions,
    ) -> DispatchResult {
        let jobs = self.plan(stations, items);
        let mut result = DispatchResult {
            order_id: order.id.clone(),
            jobs: jobs.len(),
            ..DispatchResult::default()
        };
        if jobs.is_empty() {
            info!("No items to print");
            return result;
        }

        let input = Arc::new(DispatchInput {
            order: order.clone(),
            bill_items: bill_items.to_vec(),
            kind,
            options,
        });

        let mut labels = Vec::with_capacity(jobs.len());
        let mut handles: Vec<JoinHandle<Result<(), PrintJobError>>> = Vec::with_capacity(jobs.len());
        for job in jobs {
            labels.push((job.key, job.station_name.clone()));
            handles.push(tokio::spawn(self.clone().run_job(Arc::clone(&input), job)));
        }

        let outcomes = join_all(handles).await;
        for ((station, station_name), outcome) in labels.into_iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|e| Err(PrintJobError::Aborted(e.to_string())));
            match outcome {
                Ok(()) => {
                    info!(%station, station_name = %station_name, "Kitchen ticket printed");
                    result.printed += 1;
                }
                Err(e) => {
                    error!(%station, station_name = %station_name, error = %e, "Failed to print kitchen ticket");
                    result.failures.push(StationFailure {
                        station,
                        station_name,
                        message: e.to_string(),
                    });
                }
            }
        }

        if result.failures.is_empty() {
            info!(jobs = result.jobs, "Dispatch complete");
        } else {
            warn!(
                jobs = result.jobs,
                printed = result.printed,
                failed = result.failures.len(),
                "Dispatch finished with failures"
            );
        }
        result
    }

    fn plan(&self, stations: &StationMap, items: &[OrderItem]) -> Vec<StationJob> {
        stations
            .partition(items)
            .into_jobs()
            .into_iter()
            .map(|(key, items)| {
                let (station_name, target) = match key {
                    StationKey::Station(id) => stations
                        .station(id)
                        .map(|s| (s.name.clone(), s.printer_target.clone()))
                        .unwrap_or_else(|| (format!("#{}", id), self.default_printer.clone())),
                    StationKey::Default => {
                        (DEFAULT_STATION_NAME.to_string(), self.default_printer.clone())
                    }
                };
                StationJob {
                    key,
                    station_name,
                    target,
                    items,
                }
            })
            .collect()
    }

    /// One station job; the surface goes back to the pool when this
    /// future completes or is dropped on timeout
    #[instrument(skip_all, fields(station = %job.key, target = %job.target))]
    async fn run_job(self, input: Arc<DispatchInput>, job: StationJob) -> Result<(), PrintJobError> {
        let work = async {
            let mut surface = self.pool.acquire();
            self.renderer.render(
                surface.builder(),
                &Ticket {
                    order: &input.order,
                    station_name: &job.station_name,
                    items: &job.items,
                    bill_items: &input.bill_items,
                    kind: &input.kind,
                    options: input.options,
                },
            );
            let document = surface.encode();
            self.capability.submit(document, &job.target).await?;
            Ok::<(), PrintJobError>(())
        };

        tokio::time::timeout(self.job_timeout, work)
            .await
            .map_err(|_| PrintJobError::Timeout(self.job_timeout.as_millis()))?
    }
}

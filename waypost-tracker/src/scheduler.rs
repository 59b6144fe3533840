//! Periodic driver for the movement simulator.
//!
//! Every interval the scheduler loads the orders that are out for delivery,
//! drops route state for orders that no longer are, and ticks each active
//! order with bounded concurrency. A failing or panicking order is logged
//! and counted; it never stops the rest of the cycle.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{FutureExt, StreamExt, stream};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use waypost_core::{DeliveryDirectory, DirectoryError, Geocoder, OrderId, RoutePlanner};

use crate::simulator::{MovementSimulator, TickOutcome};

/// Shortest interval [`TickScheduler::run`] will wait between cycles.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for [`TickScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Wall-clock time between cycles.
    pub interval: Duration,
    /// Maximum number of orders ticked at once.
    pub concurrency: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            concurrency: 4,
        }
    }
}

impl SchedulerConfig {
    /// Set the interval between cycles. Anything below [`MIN_INTERVAL`] is
    /// raised to it.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = if interval.as_nanos() < MIN_INTERVAL.as_nanos() {
            MIN_INTERVAL
        } else {
            interval
        };
        self
    }

    /// Set the per-cycle concurrency. Zero is treated as one.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// Summary of one scheduler cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Orders picked up this cycle.
    pub processed: usize,
    /// Ticks that completed.
    pub succeeded: usize,
    /// Ticks skipped because one was already in flight.
    pub skipped: usize,
    /// Ticks that returned an error or panicked.
    pub failed: usize,
    /// Routes dropped for orders no longer in delivery.
    pub pruned: usize,
}

enum TickResult {
    Done,
    Skipped,
    Failed,
}

/// Runs [`MovementSimulator::tick`] for every active order on a timer.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use waypost_core::InMemoryDirectory;
/// use waypost_core::test_support::{StubGeocoder, StubRoutePlanner};
/// use waypost_tracker::{
///     MovementSimulator, RouteStateStore, SchedulerConfig, SimulatorConfig, TickScheduler,
/// };
///
/// # async fn run() {
/// let store = Arc::new(RouteStateStore::new(
///     Arc::new(InMemoryDirectory::default()),
///     StubRoutePlanner::straight_line(8),
///     StubGeocoder::default(),
/// ));
/// let simulator = Arc::new(MovementSimulator::new(store, SimulatorConfig::default()));
/// let scheduler = TickScheduler::new(simulator, SchedulerConfig::default());
///
/// let shutdown = CancellationToken::new();
/// scheduler.run(shutdown.clone()).await;
/// # }
/// ```
#[derive(Debug)]
pub struct TickScheduler<D, P, G> {
    simulator: Arc<MovementSimulator<D, P, G>>,
    config: SchedulerConfig,
}

impl<D, P, G> TickScheduler<D, P, G>
where
    D: DeliveryDirectory,
    P: RoutePlanner,
    G: Geocoder,
{
    /// Create a scheduler driving `simulator`.
    pub const fn new(simulator: Arc<MovementSimulator<D, P, G>>, config: SchedulerConfig) -> Self {
        Self { simulator, config }
    }

    /// Run cycles every [`SchedulerConfig::interval`] until `shutdown` is
    /// cancelled. The first cycle starts immediately.
    pub async fn run(&self, shutdown: CancellationToken) {
        let period = self.config.interval.max(MIN_INTERVAL);
        log::info!(
            "tick scheduler started: interval {period:?}, concurrency {}",
            self.config.concurrency
        );
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    log::info!("tick scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(err) = self.run_cycle().await {
                        log::warn!("tick cycle skipped: {err}");
                    }
                }
            }
        }
    }

    /// Tick every order currently out for delivery once.
    ///
    /// # Errors
    ///
    /// Returns an error only when the active orders cannot be listed;
    /// per-order failures are counted in the report.
    pub async fn run_cycle(&self) -> Result<CycleReport, DirectoryError> {
        let store = self.simulator.store();
        let orders = store.directory().orders_in_delivery().await?;
        let active: HashSet<OrderId> = orders.iter().map(|order| order.id).collect();
        let mut report = CycleReport {
            processed: active.len(),
            pruned: store.retain(&active),
            ..CycleReport::default()
        };

        let results: Vec<TickResult> = stream::iter(active)
            .map(|order| self.tick_isolated(order))
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;
        for result in results {
            match result {
                TickResult::Done => report.succeeded += 1,
                TickResult::Skipped => report.skipped += 1,
                TickResult::Failed => report.failed += 1,
            }
        }

        log::info!(
            "tick cycle: {} processed, {} succeeded, {} skipped, {} failed, {} pruned",
            report.processed,
            report.succeeded,
            report.skipped,
            report.failed,
            report.pruned
        );
        Ok(report)
    }

    async fn tick_isolated(&self, order: OrderId) -> TickResult {
        match AssertUnwindSafe(self.simulator.tick(order))
            .catch_unwind()
            .await
        {
            Ok(Ok(TickOutcome::InFlight)) => TickResult::Skipped,
            Ok(Ok(_)) => TickResult::Done,
            Ok(Err(err)) => {
                log::warn!("order {order}: tick failed: {err}");
                TickResult::Failed
            }
            Err(_) => {
                log::warn!("order {order}: tick panicked");
                TickResult::Failed
            }
        }
    }
}

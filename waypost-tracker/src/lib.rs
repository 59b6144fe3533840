//! Route state, courier movement and tracking for the Waypost engine.
//!
//! This crate wires the seams from `waypost-core` together:
//!
//! - [`RouteStateStore`] keeps one waypoint route per order, created on
//!   first use and locked per order.
//! - [`MovementSimulator`] advances a courier along that route one tick at a
//!   time, with speeds drawn from a seeded [`SpeedModel`].
//! - [`TrackingReporter`] turns the current state into a
//!   [`waypost_core::TrackingSnapshot`], falling back to straight-line
//!   estimates when live routing fails.
//! - [`TickScheduler`] ticks every active order on a fixed interval and
//!   keeps one order's failure from affecting the others.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod reporter;
mod scheduler;
mod simulator;
mod speed;
mod store;

pub use error::{PreconditionError, RouteStoreError, TickError, TrackingError};
pub use reporter::{TrackingConfig, TrackingReporter};
pub use scheduler::{CycleReport, MIN_INTERVAL, SchedulerConfig, TickScheduler};
pub use simulator::{MovementSimulator, SimulatorConfig, TickOutcome};
pub use speed::{MAX_SPEED_FACTOR, MIN_SPEED_FACTOR, SpeedModel};
pub use store::RouteStateStore;

//! Plan road routes between two coordinates.
//!
//! The `RoutePlanner` trait abstracts the routing engine. Callers supply an
//! origin, a destination and the courier's vehicle, and receive a
//! [`RouteResult`] with the road distance, the duration and optionally the
//! waypoints of the route geometry.
//!
//! Errors are classified so callers can tell transient failures (worth
//! retrying) from permanent ones.

mod error;
mod planner;

pub use error::PlanningError;
pub use planner::{RoutePlanner, RouteResult};

//! HTTP route planning against an OSRM routing service.
//!
//! This module provides [`HttpRoutePlanner`], an implementation of
//! [`waypost_core::RoutePlanner`] that asks the OSRM Route API for the
//! distance, duration and (optionally) geometry between two coordinates.
//!
//! # Architecture
//!
//! Response geometry arrives either as GeoJSON coordinate arrays or as an
//! encoded polyline string, depending on [`GeometryFormat`]. Both are turned
//! into a plain `Vec<Coordinates>` at the HTTP boundary so callers never
//! branch on the wire format.
//!
//! # Example
//!
//! ```no_run
//! use waypost_data::routing::{GeometryFormat, HttpRoutePlanner, RoutePlannerConfig};
//! use waypost_core::{Coordinates, RoutePlanner, VehicleType};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RoutePlannerConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(3))
//!     .with_max_retries(5)
//!     .with_geometry(GeometryFormat::Polyline6);
//! let planner = HttpRoutePlanner::with_config(config)?;
//!
//! let route = planner
//!     .plan(
//!         Coordinates::from_degrees(-23.5505, -46.6333)?,
//!         Coordinates::from_degrees(-23.5631, -46.6542)?,
//!         VehicleType::Bicycle,
//!         true,
//!     )
//!     .await?;
//! println!("{} waypoints", route.waypoints.map_or(0, |w| w.len()));
//! # Ok(())
//! # }
//! ```

mod osrm;
mod planner;
pub mod polyline;

pub use osrm::GeometryError;
pub use planner::{
    DEFAULT_ROUTING_URL, DEFAULT_USER_AGENT, GeometryFormat, HttpRoutePlanner, RoutePlannerConfig,
};

//! Core domain types for the Waypost delivery-positioning engine.
//!
//! These models describe where couriers are, where orders are going and how
//! a route between the two is walked. Constructors return `Result` to surface
//! invalid input early.
//!
//! The crate also defines the seams the rest of the engine plugs into:
//! [`Geocoder`] for address resolution, [`RoutePlanner`] for road routing and
//! [`DeliveryDirectory`] for the order/courier/restaurant collaborator.

#![forbid(unsafe_code)]

pub mod coordinates;
pub mod directory;
pub mod geocoding;
pub mod ids;
pub mod planning;
pub mod route;
pub mod tracking;
pub mod vehicle;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use coordinates::{COORDINATE_SCALE, Coordinates, CoordinatesError};
pub use directory::{
    CourierSnapshot, DeliveryDirectory, DirectoryError, InMemoryDirectory, OrderSnapshot,
    OrderStatus, RestaurantSnapshot,
};
pub use geocoding::Geocoder;
pub use ids::{CourierId, OrderId, RestaurantId};
pub use planning::{PlanningError, RoutePlanner, RouteResult};
pub use route::{Route, RouteError};
pub use tracking::{DistanceSource, RouteProgress, TrackingSnapshot};
pub use vehicle::{UnknownVehicleError, VehicleType};

//! Facade crate for the Waypost delivery-positioning engine.
//!
//! This crate re-exports the core domain types and exposes the HTTP adapters
//! and the courier tracker behind feature flags.

#![forbid(unsafe_code)]

pub use waypost_core::{
    Coordinates, CoordinatesError, CourierId, CourierSnapshot, DeliveryDirectory,
    DirectoryError, DistanceSource, Geocoder, InMemoryDirectory, OrderId, OrderSnapshot,
    OrderStatus, PlanningError, RestaurantId, RestaurantSnapshot, Route, RouteError,
    RoutePlanner, RouteProgress, RouteResult, TrackingSnapshot, VehicleType,
};

#[cfg(feature = "http")]
pub use waypost_data::{
    GeocodingConfig, GeometryFormat, HttpCoordinateResolver, HttpRoutePlanner,
    ProviderBuildError, RoutePlannerConfig,
};

#[cfg(feature = "tracker")]
pub use waypost_tracker::{
    CycleReport, MovementSimulator, PreconditionError, RouteStateStore, RouteStoreError,
    SchedulerConfig, SimulatorConfig, TickError, TickOutcome, TickScheduler, TrackingConfig,
    TrackingError, TrackingReporter,
};

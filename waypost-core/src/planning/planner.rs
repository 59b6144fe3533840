//! Route-planner trait and its result type.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{Coordinates, VehicleType};

use super::error::PlanningError;

/// Road distance, duration and optional geometry between two points.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    /// Road distance in kilometres, rounded to two decimal places.
    pub distance_km: Decimal,
    /// Travel time in whole minutes, rounded up.
    pub duration_minutes: u32,
    /// Route geometry from origin to destination, when requested.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub waypoints: Option<Vec<Coordinates>>,
}

/// Plan a road route between two coordinates.
///
/// Implementations own their retry policy: by the time `plan` returns an
/// error, the caller should treat the route as not found.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use rust_decimal::Decimal;
/// use waypost_core::{Coordinates, PlanningError, RoutePlanner, RouteResult, VehicleType};
///
/// struct DirectLine;
///
/// #[async_trait]
/// impl RoutePlanner for DirectLine {
///     async fn plan(
///         &self,
///         origin: Coordinates,
///         destination: Coordinates,
///         _vehicle: VehicleType,
///         include_waypoints: bool,
///     ) -> Result<RouteResult, PlanningError> {
///         Ok(RouteResult {
///             distance_km: Decimal::ONE,
///             duration_minutes: 2,
///             waypoints: include_waypoints.then(|| vec![origin, destination]),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait RoutePlanner: Send + Sync {
    /// Plan a route from `origin` to `destination` for `vehicle`.
    ///
    /// When `include_waypoints` is true, a successful result must carry at
    /// least the origin and destination waypoints; a route without geometry
    /// is reported as [`PlanningError::MissingGeometry`].
    async fn plan(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        vehicle: VehicleType,
        include_waypoints: bool,
    ) -> Result<RouteResult, PlanningError>;
}

//! Rider-facing tracking snapshots.

use rust_decimal::Decimal;

use crate::{Coordinates, OrderStatus};

/// How the remaining distance in a [`TrackingSnapshot`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DistanceSource {
    /// Live road distance from the routing engine.
    Road,
    /// Great-circle estimate used when routing was unavailable.
    StraightLine,
}

/// Progress along the stored route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteProgress {
    /// Index of the waypoint being approached.
    pub current_index: usize,
    /// Total number of waypoints.
    pub waypoint_count: usize,
}

/// Where an order's courier is and how far they still have to go.
///
/// Only `status` is guaranteed. The remaining fields stay empty when the
/// order has no courier, no resolved destination, or the courier's position
/// is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackingSnapshot {
    /// Order lifecycle state.
    pub status: OrderStatus,
    /// Courier's current position.
    pub current_position: Option<Coordinates>,
    /// Delivery destination.
    pub destination_position: Option<Coordinates>,
    /// Remaining distance in kilometres, two decimal places.
    pub remaining_distance_km: Option<Decimal>,
    /// Estimated minutes to arrival, rounded up.
    pub eta_minutes: Option<u32>,
    /// True when the courier is close enough to show "arriving now".
    pub is_near_destination: bool,
    /// Source of `remaining_distance_km`.
    pub distance_source: Option<DistanceSource>,
    /// Progress along the stored route, when one exists.
    pub route_progress: Option<RouteProgress>,
}

impl TrackingSnapshot {
    /// A snapshot carrying only the order status.
    #[must_use]
    pub const fn status_only(status: OrderStatus) -> Self {
        Self {
            status,
            current_position: None,
            destination_position: None,
            remaining_distance_km: None,
            eta_minutes: None,
            is_near_destination: false,
            distance_source: None,
            route_progress: None,
        }
    }
}

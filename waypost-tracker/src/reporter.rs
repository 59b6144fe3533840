//! Rider-facing tracking snapshots.
//!
//! The reporter asks the routing engine for the live road distance between
//! the courier and the destination. When that fails it falls back to the
//! great-circle distance and an ETA at the vehicle's base speed, so callers
//! always get a snapshot.

use std::sync::Arc;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use waypost_core::{
    Coordinates, DeliveryDirectory, DistanceSource, Geocoder, OrderId, RoutePlanner,
    TrackingSnapshot, VehicleType,
};

use crate::error::TrackingError;
use crate::store::RouteStateStore;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Configuration for [`TrackingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingConfig {
    /// Remaining distance, in km, at or below which the courier is shown as
    /// arriving.
    pub near_destination_km: Decimal,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            near_destination_km: Decimal::new(1, 1),
        }
    }
}

impl TrackingConfig {
    /// Set the near-destination threshold.
    #[must_use]
    pub const fn with_near_destination_km(mut self, threshold: Decimal) -> Self {
        self.near_destination_km = threshold;
        self
    }
}

/// Builds [`TrackingSnapshot`]s for orders.
#[derive(Debug)]
pub struct TrackingReporter<D, P, G> {
    store: Arc<RouteStateStore<D, P, G>>,
    config: TrackingConfig,
}

impl<D, P, G> TrackingReporter<D, P, G>
where
    D: DeliveryDirectory,
    P: RoutePlanner,
    G: Geocoder,
{
    /// Create a reporter reading from `store`.
    pub const fn new(store: Arc<RouteStateStore<D, P, G>>, config: TrackingConfig) -> Self {
        Self { store, config }
    }

    /// Snapshot of where the order's courier is and how far they have left.
    ///
    /// Orders without a courier or destination, and couriers with no known
    /// position, yield a snapshot with only the status (and destination,
    /// when known) filled in.
    ///
    /// # Errors
    ///
    /// Fails only when the order does not exist or the directory is
    /// unavailable. Routing failures degrade to a straight-line estimate.
    pub async fn report(&self, order_id: OrderId) -> Result<TrackingSnapshot, TrackingError> {
        let directory = self.store.directory();
        let order = directory
            .order(order_id)
            .await?
            .ok_or(TrackingError::UnknownOrder(order_id))?;

        let (Some(courier_id), Some(destination)) = (order.courier_id, order.destination) else {
            return Ok(TrackingSnapshot::status_only(order.status));
        };
        let Some(courier) = directory.courier(courier_id).await? else {
            log::warn!("order {order_id}: assigned courier {courier_id} does not exist");
            return Ok(TrackingSnapshot::status_only(order.status));
        };

        let mut snapshot = TrackingSnapshot {
            destination_position: Some(destination),
            route_progress: self.store.progress(order_id).await,
            ..TrackingSnapshot::status_only(order.status)
        };
        let Some(current) = courier.position.or(order.restaurant.coordinates) else {
            return Ok(snapshot);
        };
        snapshot.current_position = Some(current);

        let (distance_km, eta_minutes, source) =
            match self
                .store
                .planner()
                .plan(current, destination, courier.vehicle, false)
                .await
            {
                Ok(route) => (route.distance_km, route.duration_minutes, DistanceSource::Road),
                Err(err) => {
                    log::warn!(
                        "order {order_id}: live routing failed, using straight-line estimate: {err}"
                    );
                    let (km, minutes) = straight_line_estimate(current, destination, courier.vehicle);
                    (km, minutes, DistanceSource::StraightLine)
                }
            };

        snapshot.remaining_distance_km = Some(distance_km);
        snapshot.eta_minutes = Some(eta_minutes);
        snapshot.is_near_destination = distance_km <= self.config.near_destination_km;
        snapshot.distance_source = Some(source);
        Ok(snapshot)
    }
}

/// Great-circle distance rounded to two places, and minutes at base speed
/// rounded up.
fn straight_line_estimate(
    from: Coordinates,
    to: Coordinates,
    vehicle: VehicleType,
) -> (Decimal, u32) {
    let km = from.distance_km(&to);
    let distance = Decimal::from_f64(km)
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let minutes = Decimal::from_f64(km / vehicle.base_speed_kmh() * MINUTES_PER_HOUR)
        .unwrap_or_default()
        .ceil()
        .to_u32()
        .unwrap_or(u32::MAX);
    (distance, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    fn straight_line_estimate_uses_base_speed() {
        let from = Coordinates::from_degrees(-23.5505, -46.6333).expect("valid");
        let to = Coordinates::from_degrees(-23.5631, -46.6542).expect("valid");

        let (km, minutes) = straight_line_estimate(from, to, VehicleType::Motorcycle);

        assert_eq!(km, dec!(2.55));
        // 2.55 km at 30 km/h is 5.1 minutes.
        assert_eq!(minutes, 6);
    }

    #[rstest]
    fn same_point_is_zero() {
        let here = Coordinates::from_degrees(-8.05, -34.9).expect("valid");

        assert_eq!(
            straight_line_estimate(here, here, VehicleType::Bicycle),
            (Decimal::ZERO, 0)
        );
    }

    #[rstest]
    fn default_threshold_is_one_hundred_metres() {
        assert_eq!(TrackingConfig::default().near_destination_km, dec!(0.1));
    }
}

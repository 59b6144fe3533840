//! Courier movement simulation.
//!
//! One [`MovementSimulator::tick`] moves one order's courier by one
//! simulation interval along the order's route:
//!
//! 1. Check the order is out for delivery with a courier and a destination.
//! 2. Seed the courier's position from the restaurant if unknown, then make
//!    sure the order has a route.
//! 3. Once the route is complete and the courier sits within the arrival
//!    threshold of the destination, snap onto it and stop.
//! 4. Otherwise head for the next waypoint (or, on the final leg, the
//!    destination) at a jittered vehicle speed: snap onto it when it is
//!    within this tick's reach, else interpolate part of the way.
//! 5. Persist the new position, then advance the route cursor.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use waypost_core::{
    Coordinates, CourierSnapshot, DeliveryDirectory, Geocoder, OrderId, OrderSnapshot,
    OrderStatus, RoutePlanner,
};

use crate::error::{PreconditionError, TickError};
use crate::speed::SpeedModel;
use crate::store::RouteStateStore;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Configuration for [`MovementSimulator`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Simulated time covered by one tick.
    pub tick_interval: Duration,
    /// Multiplier applied to the distance covered per tick.
    pub acceleration: f64,
    /// Distance from the destination, in km, at which the courier has
    /// arrived.
    pub arrival_threshold_km: f64,
    /// Traffic variance applied to the base speed (0.2 = ±20%).
    pub speed_jitter: f64,
    /// Seed for the speed model; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(10),
            acceleration: 10.0,
            arrival_threshold_km: 0.01,
            speed_jitter: 0.2,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    /// Set the simulated interval per tick.
    #[must_use]
    pub const fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Set the distance multiplier. Values that are not finite and
    /// positive fall back to real time (`1.0`).
    #[must_use]
    pub fn with_acceleration(mut self, acceleration: f64) -> Self {
        self.acceleration = sanitise_acceleration(acceleration);
        self
    }

    /// Set the arrival threshold in kilometres.
    #[must_use]
    pub const fn with_arrival_threshold_km(mut self, threshold: f64) -> Self {
        self.arrival_threshold_km = threshold;
        self
    }

    /// Set the speed jitter.
    #[must_use]
    pub const fn with_speed_jitter(mut self, jitter: f64) -> Self {
        self.speed_jitter = jitter;
        self
    }

    /// Seed the speed model for reproducible runs.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn sanitise_acceleration(acceleration: f64) -> f64 {
    if acceleration.is_finite() && acceleration > 0.0 {
        acceleration
    } else {
        1.0
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Another tick for the same order was still running; nothing changed.
    InFlight,
    /// The courier is at the destination. Further ticks stay here.
    Arrived,
    /// The courier was placed on the destination this tick.
    SnappedToDestination,
    /// The courier reached waypoint `index` and the cursor moved past it.
    ReachedWaypoint {
        /// Index of the waypoint reached.
        index: usize,
    },
    /// The courier moved part of the way to its next target.
    Moved {
        /// Straight-line distance left to the target, in km.
        remaining_km: f64,
    },
}

/// Advances couriers along their routes.
#[derive(Debug)]
pub struct MovementSimulator<D, P, G> {
    store: Arc<RouteStateStore<D, P, G>>,
    config: SimulatorConfig,
    speed: Mutex<SpeedModel>,
    in_flight: Mutex<HashSet<OrderId>>,
}

/// Removes an order from the in-flight set when the tick ends.
struct InFlightGuard<'a> {
    orders: &'a Mutex<HashSet<OrderId>>,
    order: OrderId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.order);
    }
}

struct Delivery {
    order: OrderSnapshot,
    courier: CourierSnapshot,
    destination: Coordinates,
}

impl<D, P, G> MovementSimulator<D, P, G>
where
    D: DeliveryDirectory,
    P: RoutePlanner,
    G: Geocoder,
{
    /// Create a simulator over `store`.
    pub fn new(store: Arc<RouteStateStore<D, P, G>>, mut config: SimulatorConfig) -> Self {
        config.acceleration = sanitise_acceleration(config.acceleration);
        let speed = match config.seed {
            Some(seed) => SpeedModel::seeded(seed, config.speed_jitter),
            None => SpeedModel::from_entropy(config.speed_jitter),
        };
        Self {
            store,
            config,
            speed: Mutex::new(speed),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Route state shared with the tracking reporter.
    pub const fn store(&self) -> &Arc<RouteStateStore<D, P, G>> {
        &self.store
    }

    /// Configuration in use.
    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Advance one order's courier by one interval.
    ///
    /// # Errors
    ///
    /// - [`TickError::Precondition`] when the order is unknown, not out for
    ///   delivery, has no courier or no destination. Nothing is written.
    /// - [`TickError::Route`] when no route can be planned.
    /// - [`TickError::Directory`] when reading or writing the directory
    ///   fails.
    pub async fn tick(&self, order_id: OrderId) -> Result<TickOutcome, TickError> {
        let Some(_guard) = self.claim(order_id) else {
            log::debug!("order {order_id}: tick already in flight, skipping");
            return Ok(TickOutcome::InFlight);
        };

        let directory = self.store.directory();
        let Delivery {
            order,
            mut courier,
            destination,
        } = self.load_delivery(order_id).await?;

        let position = match courier.position {
            Some(position) => position,
            None => {
                let start = self
                    .store
                    .restaurant_origin(order_id, &order.restaurant)
                    .await?;
                directory.update_courier_position(courier.id, start).await?;
                log::debug!(
                    "order {order_id}: courier {} starts at restaurant {start}",
                    courier.id
                );
                courier.position = Some(start);
                start
            }
        };

        self.store.get_or_create(&order, &courier).await?;

        let outcome = self.step(order_id, &courier, position, destination).await?;
        log::debug!("order {order_id}: {outcome:?}");
        Ok(outcome)
    }

    async fn step(
        &self,
        order_id: OrderId,
        courier: &CourierSnapshot,
        position: Coordinates,
        destination: Coordinates,
    ) -> Result<TickOutcome, TickError> {
        let directory = self.store.directory();
        let courier_id = courier.id;
        let complete = self.store.is_complete(order_id).await;

        if complete && position.distance_km(&destination) <= self.config.arrival_threshold_km {
            if position != destination {
                directory
                    .update_courier_position(courier_id, destination)
                    .await?;
            }
            return Ok(TickOutcome::Arrived);
        }

        let target = if complete {
            destination
        } else if let Some(waypoint) = self.store.next_waypoint(order_id).await {
            waypoint
        } else {
            directory
                .update_courier_position(courier_id, destination)
                .await?;
            return Ok(TickOutcome::SnappedToDestination);
        };

        let reach_km = self.reach_km(courier);
        let remaining_km = position.distance_km(&target);

        if reach_km < remaining_km {
            let next = position.interpolate(&target, reach_km / remaining_km);
            directory.update_courier_position(courier_id, next).await?;
            return Ok(TickOutcome::Moved {
                remaining_km: next.distance_km(&target),
            });
        }

        directory.update_courier_position(courier_id, target).await?;
        if complete {
            return Ok(TickOutcome::SnappedToDestination);
        }
        let index = self
            .store
            .progress(order_id)
            .await
            .map_or(0, |progress| progress.current_index);
        self.store.advance(order_id, 1).await;
        Ok(TickOutcome::ReachedWaypoint { index })
    }

    /// Distance the courier covers this tick, in km.
    fn reach_km(&self, courier: &CourierSnapshot) -> f64 {
        let speed_kmh = self.lock_speed().speed_kmh(courier.vehicle);
        speed_kmh * self.config.tick_interval.as_secs_f64() / SECONDS_PER_HOUR
            * self.config.acceleration
    }

    async fn load_delivery(&self, order_id: OrderId) -> Result<Delivery, TickError> {
        let directory = self.store.directory();
        let order = directory
            .order(order_id)
            .await?
            .ok_or(PreconditionError::UnknownOrder(order_id))?;
        if order.status != OrderStatus::OutForDelivery {
            return Err(PreconditionError::NotInDelivery {
                order: order_id,
                status: order.status,
            }
            .into());
        }
        let courier_id = order
            .courier_id
            .ok_or(PreconditionError::NoCourier(order_id))?;
        let destination = order
            .destination
            .ok_or(PreconditionError::NoDestination(order_id))?;
        let courier = directory.courier(courier_id).await?.ok_or(
            PreconditionError::UnknownCourier {
                order: order_id,
                courier: courier_id,
            },
        )?;
        Ok(Delivery {
            order,
            courier,
            destination,
        })
    }

    fn claim(&self, order: OrderId) -> Option<InFlightGuard<'_>> {
        let inserted = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(order);
        inserted.then(|| InFlightGuard {
            orders: &self.in_flight,
            order,
        })
    }

    fn lock_speed(&self) -> MutexGuard<'_, SpeedModel> {
        self.speed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//! Per-order route state.
//!
//! Each order owns at most one [`Route`]. Routes are created lazily the first
//! time a tick or a query needs one and never re-planned afterwards. State is
//! kept in slots keyed by order id, each behind its own async mutex, so work
//! on one order never waits on another.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use waypost_core::{
    Coordinates, CourierSnapshot, DeliveryDirectory, Geocoder, OrderId, OrderSnapshot,
    RestaurantSnapshot, Route, RouteProgress, RoutePlanner,
};

use crate::error::RouteStoreError;

type Slot = Arc<tokio::sync::Mutex<Option<Route>>>;

/// Arena of routes keyed by order id, with per-key locking.
///
/// The store owns the collaborators needed to seed a route: the directory
/// (to record geocoded restaurant coordinates), the planner and the
/// geocoder.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use waypost_core::InMemoryDirectory;
/// use waypost_core::test_support::{StubGeocoder, StubRoutePlanner};
/// use waypost_tracker::RouteStateStore;
///
/// let store = RouteStateStore::new(
///     Arc::new(InMemoryDirectory::default()),
///     StubRoutePlanner::straight_line(4),
///     StubGeocoder::default(),
/// );
/// assert!(store.is_empty());
/// ```
#[derive(Debug)]
pub struct RouteStateStore<D, P, G> {
    directory: Arc<D>,
    planner: P,
    geocoder: G,
    slots: Mutex<HashMap<OrderId, Slot>>,
}

impl<D, P, G> RouteStateStore<D, P, G>
where
    D: DeliveryDirectory,
    P: RoutePlanner,
    G: Geocoder,
{
    /// Create an empty store.
    pub fn new(directory: Arc<D>, planner: P, geocoder: G) -> Self {
        Self {
            directory,
            planner,
            geocoder,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Directory the store seeds routes from.
    pub const fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    /// Route planner used for new routes.
    pub const fn planner(&self) -> &P {
        &self.planner
    }

    /// Return the order's route, planning it on first use.
    ///
    /// The origin is the courier's position when known, otherwise the
    /// restaurant's coordinates (geocoding its address if needed). Creation
    /// is serialised per order: concurrent callers for the same order wait
    /// for the first and then share its route, so the planner is called once.
    ///
    /// # Errors
    ///
    /// Fails when the order has no destination, the origin cannot be
    /// located, or the planner returns no walkable route. Planning is not
    /// retried here; the planner applies its own retry policy.
    pub async fn get_or_create(
        &self,
        order: &OrderSnapshot,
        courier: &CourierSnapshot,
    ) -> Result<Route, RouteStoreError> {
        let slot = self.slot(order.id);
        let mut route = slot.lock().await;
        if let Some(existing) = route.as_ref() {
            return Ok(existing.clone());
        }

        let destination = order
            .destination
            .ok_or(RouteStoreError::MissingDestination(order.id))?;
        let origin = match courier.position {
            Some(position) => position,
            None => self.restaurant_origin(order.id, &order.restaurant).await?,
        };

        let planned = self
            .planner
            .plan(origin, destination, courier.vehicle, true)
            .await
            .map_err(|source| RouteStoreError::Planning {
                order: order.id,
                source,
            })?;
        let created = Route::new(planned.waypoints.unwrap_or_default()).map_err(|source| {
            RouteStoreError::InvalidRoute {
                order: order.id,
                source,
            }
        })?;

        log::debug!(
            "order {}: planned route with {} waypoints ({} km)",
            order.id,
            created.waypoints().len(),
            planned.distance_km
        );
        *route = Some(created.clone());
        Ok(created)
    }

    /// Coordinates of `restaurant`, geocoding its address when unknown.
    ///
    /// Freshly geocoded coordinates are written back to the directory so the
    /// next route skips the lookup; a failed write is logged, not returned.
    ///
    /// # Errors
    ///
    /// [`RouteStoreError::RestaurantUnresolved`] when the address does not
    /// geocode.
    pub async fn restaurant_origin(
        &self,
        order: OrderId,
        restaurant: &RestaurantSnapshot,
    ) -> Result<Coordinates, RouteStoreError> {
        if let Some(known) = restaurant.coordinates {
            return Ok(known);
        }
        let resolved = self
            .geocoder
            .resolve(&restaurant.address)
            .await
            .ok_or(RouteStoreError::RestaurantUnresolved {
                order,
                restaurant: restaurant.id,
            })?;
        if let Err(err) = self
            .directory
            .record_restaurant_coordinates(restaurant.id, resolved)
            .await
        {
            log::warn!(
                "order {order}: could not record coordinates for restaurant {}: {err}",
                restaurant.id
            );
        }
        Ok(resolved)
    }

    /// Waypoint the courier is heading for, or `None` once the cursor sits
    /// on the final waypoint (or no route exists).
    pub async fn next_waypoint(&self, order: OrderId) -> Option<Coordinates> {
        let slot = self.existing_slot(order)?;
        let route = slot.lock().await;
        route.as_ref().and_then(Route::next_waypoint)
    }

    /// Move the cursor forward by `steps`, stopping at the final waypoint.
    ///
    /// Returns `true` when the cursor moved.
    pub async fn advance(&self, order: OrderId, steps: usize) -> bool {
        let Some(slot) = self.existing_slot(order) else {
            return false;
        };
        let mut route = slot.lock().await;
        route.as_mut().is_some_and(|route| route.advance(steps))
    }

    /// Whether the cursor has reached the final waypoint.
    ///
    /// Orders without a route are reported as not complete.
    pub async fn is_complete(&self, order: OrderId) -> bool {
        let Some(slot) = self.existing_slot(order) else {
            return false;
        };
        let route = slot.lock().await;
        route.as_ref().is_some_and(Route::is_complete)
    }

    /// Snapshot of the order's route, if one exists.
    pub async fn route(&self, order: OrderId) -> Option<Route> {
        let slot = self.existing_slot(order)?;
        let route = slot.lock().await;
        route.clone()
    }

    /// Cursor position and waypoint count for the order's route.
    pub async fn progress(&self, order: OrderId) -> Option<RouteProgress> {
        let slot = self.existing_slot(order)?;
        let route = slot.lock().await;
        route.as_ref().map(|route| RouteProgress {
            current_index: route.current_index(),
            waypoint_count: route.waypoints().len(),
        })
    }

    /// Drop the order's route. Returns `true` if one was stored.
    pub fn remove(&self, order: OrderId) -> bool {
        self.lock_slots().remove(&order).is_some()
    }

    /// Keep only routes for `active` orders. Returns how many were dropped.
    pub fn retain(&self, active: &HashSet<OrderId>) -> usize {
        let mut slots = self.lock_slots();
        let before = slots.len();
        slots.retain(|order, _| active.contains(order));
        before - slots.len()
    }

    /// Number of orders with a slot.
    pub fn len(&self) -> usize {
        self.lock_slots().len()
    }

    /// Whether no order has a slot.
    pub fn is_empty(&self) -> bool {
        self.lock_slots().is_empty()
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<OrderId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, order: OrderId) -> Slot {
        Arc::clone(self.lock_slots().entry(order).or_default())
    }

    fn existing_slot(&self, order: OrderId) -> Option<Slot> {
        self.lock_slots().get(&order).map(Arc::clone)
    }
}

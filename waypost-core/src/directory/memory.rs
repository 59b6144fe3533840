//! In-process [`DeliveryDirectory`] backed by hash maps.
//!
//! Useful for demos, the CLI's `simulate` command and tests. Every call takes
//! a single short-lived lock, so it is safe to share across tasks.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::{Coordinates, CourierId, OrderId, RestaurantId};

use super::{CourierSnapshot, DeliveryDirectory, DirectoryError, OrderSnapshot, OrderStatus};

#[derive(Debug, Default)]
struct Entities {
    orders: HashMap<OrderId, OrderSnapshot>,
    couriers: HashMap<CourierId, CourierSnapshot>,
}

/// Hash-map backed directory of orders and couriers.
///
/// # Examples
///
/// ```
/// use waypost_core::{
///     CourierId, CourierSnapshot, InMemoryDirectory, VehicleType,
/// };
///
/// let directory = InMemoryDirectory::default();
/// directory.insert_courier(CourierSnapshot {
///     id: CourierId(7),
///     vehicle: VehicleType::Bicycle,
///     position: None,
/// });
/// assert_eq!(directory.courier_position(CourierId(7)), None);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    entities: Mutex<Entities>,
}

impl InMemoryDirectory {
    fn lock(&self) -> MutexGuard<'_, Entities> {
        self.entities.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace an order.
    pub fn insert_order(&self, order: OrderSnapshot) {
        self.lock().orders.insert(order.id, order);
    }

    /// Insert or replace a courier.
    pub fn insert_courier(&self, courier: CourierSnapshot) {
        self.lock().couriers.insert(courier.id, courier);
    }

    /// Change an order's status. Returns `false` for unknown orders.
    pub fn set_status(&self, id: OrderId, status: OrderStatus) -> bool {
        self.lock()
            .orders
            .get_mut(&id)
            .map(|order| order.status = status)
            .is_some()
    }

    /// Current position of a courier, if known.
    #[must_use]
    pub fn courier_position(&self, id: CourierId) -> Option<Coordinates> {
        self.lock()
            .couriers
            .get(&id)
            .and_then(|courier| courier.position)
    }

    /// Registered coordinates of a restaurant, read from any order that
    /// references it.
    #[must_use]
    pub fn restaurant_coordinates(&self, id: RestaurantId) -> Option<Coordinates> {
        self.lock()
            .orders
            .values()
            .find(|order| order.restaurant.id == id)
            .and_then(|order| order.restaurant.coordinates)
    }
}

#[async_trait]
impl DeliveryDirectory for InMemoryDirectory {
    async fn order(&self, id: OrderId) -> Result<Option<OrderSnapshot>, DirectoryError> {
        Ok(self.lock().orders.get(&id).cloned())
    }

    async fn orders_in_delivery(&self) -> Result<Vec<OrderSnapshot>, DirectoryError> {
        let mut orders: Vec<_> = self
            .lock()
            .orders
            .values()
            .filter(|order| order.is_in_delivery())
            .cloned()
            .collect();
        orders.sort_by_key(|order| order.id);
        Ok(orders)
    }

    async fn courier(&self, id: CourierId) -> Result<Option<CourierSnapshot>, DirectoryError> {
        Ok(self.lock().couriers.get(&id).cloned())
    }

    async fn update_courier_position(
        &self,
        id: CourierId,
        position: Coordinates,
    ) -> Result<(), DirectoryError> {
        let mut entities = self.lock();
        let courier = entities
            .couriers
            .get_mut(&id)
            .ok_or(DirectoryError::UnknownCourier(id))?;
        courier.position = Some(position);
        Ok(())
    }

    async fn record_restaurant_coordinates(
        &self,
        id: RestaurantId,
        coordinates: Coordinates,
    ) -> Result<(), DirectoryError> {
        let mut entities = self.lock();
        let mut found = false;
        for order in entities.orders.values_mut() {
            if order.restaurant.id == id {
                order.restaurant.coordinates = Some(coordinates);
                found = true;
            }
        }
        if found {
            Ok(())
        } else {
            Err(DirectoryError::UnknownRestaurant(id))
        }
    }
}

//! Read and write access to the business entities the engine depends on.
//!
//! Orders, couriers and restaurants are owned by a surrounding service. The
//! engine only sees the slice it needs through [`DeliveryDirectory`]: an
//! order's status, courier and destination, a courier's vehicle and position,
//! and a restaurant's address. It writes back courier positions and, once
//! geocoded, restaurant coordinates.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::{Coordinates, CourierId, OrderId, RestaurantId, VehicleType};

pub use memory::InMemoryDirectory;

/// Lifecycle state of a delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    /// Placed but not yet accepted by the restaurant.
    Pending,
    /// Accepted by the restaurant.
    Confirmed,
    /// Being prepared.
    Preparing,
    /// Picked up and travelling to the customer.
    OutForDelivery,
    /// Handed over to the customer.
    Delivered,
    /// Cancelled before delivery.
    Cancelled,
}

/// The restaurant an order is collected from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantSnapshot {
    /// Restaurant identifier.
    pub id: RestaurantId,
    /// Registered street address.
    pub address: String,
    /// Registered coordinates, if already resolved.
    pub coordinates: Option<Coordinates>,
}

/// The parts of an order the engine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSnapshot {
    /// Order identifier.
    pub id: OrderId,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Assigned courier, if any.
    pub courier_id: Option<CourierId>,
    /// Resolved delivery coordinates, if any.
    pub destination: Option<Coordinates>,
    /// Pick-up restaurant.
    pub restaurant: RestaurantSnapshot,
}

impl OrderSnapshot {
    /// Whether the order is out for delivery with a courier assigned.
    #[must_use]
    pub const fn is_in_delivery(&self) -> bool {
        matches!(self.status, OrderStatus::OutForDelivery) && self.courier_id.is_some()
    }
}

/// The parts of a courier the engine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourierSnapshot {
    /// Courier identifier.
    pub id: CourierId,
    /// Vehicle the courier rides.
    pub vehicle: VehicleType,
    /// Last known position, if any.
    pub position: Option<Coordinates>,
}

/// Errors raised by a [`DeliveryDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The backing service could not be reached or failed.
    #[error("delivery directory unavailable: {message}")]
    Unavailable {
        /// Error detail.
        message: String,
    },
    /// A write targeted a courier the directory does not know.
    #[error("courier {0} does not exist")]
    UnknownCourier(CourierId),
    /// A write targeted a restaurant the directory does not know.
    #[error("restaurant {0} does not exist")]
    UnknownRestaurant(RestaurantId),
}

/// Collaborator interface onto orders, couriers and restaurants.
#[async_trait]
pub trait DeliveryDirectory: Send + Sync {
    /// Load one order.
    async fn order(&self, id: OrderId) -> Result<Option<OrderSnapshot>, DirectoryError>;

    /// Load every order that is out for delivery with a courier assigned.
    async fn orders_in_delivery(&self) -> Result<Vec<OrderSnapshot>, DirectoryError>;

    /// Load one courier.
    async fn courier(&self, id: CourierId) -> Result<Option<CourierSnapshot>, DirectoryError>;

    /// Persist a courier's new position.
    async fn update_courier_position(
        &self,
        id: CourierId,
        position: Coordinates,
    ) -> Result<(), DirectoryError>;

    /// Persist coordinates resolved for a restaurant's address.
    async fn record_restaurant_coordinates(
        &self,
        id: RestaurantId,
        coordinates: Coordinates,
    ) -> Result<(), DirectoryError>;
}

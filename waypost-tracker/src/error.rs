//! Error types for route state, movement ticks and tracking.

use thiserror::Error;
use waypost_core::{
    CourierId, DirectoryError, OrderId, OrderStatus, PlanningError, RestaurantId, RouteError,
};

/// Errors from [`crate::RouteStateStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteStoreError {
    /// The order has no resolved delivery coordinates.
    #[error("order {0} has no destination coordinates")]
    MissingDestination(OrderId),
    /// The restaurant has no coordinates and its address did not geocode.
    #[error("restaurant {restaurant} for order {order} could not be located")]
    RestaurantUnresolved {
        /// Order being routed.
        order: OrderId,
        /// Restaurant whose address failed to resolve.
        restaurant: RestaurantId,
    },
    /// The route planner gave up.
    #[error("cannot compute route for order {order}: {source}")]
    Planning {
        /// Order being routed.
        order: OrderId,
        /// Planner failure.
        #[source]
        source: PlanningError,
    },
    /// The planner answered without a walkable geometry.
    #[error("cannot compute route for order {order}: {source}")]
    InvalidRoute {
        /// Order being routed.
        order: OrderId,
        /// Why the waypoints were rejected.
        #[source]
        source: RouteError,
    },
    /// The directory failed while seeding the route.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// A tick was requested for an order that cannot move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// The directory does not know the order.
    #[error("order {0} does not exist")]
    UnknownOrder(OrderId),
    /// The order is not out for delivery.
    #[error("order {order} is {status:?}, not out for delivery")]
    NotInDelivery {
        /// Order id.
        order: OrderId,
        /// Current status.
        status: OrderStatus,
    },
    /// No courier is assigned.
    #[error("order {0} has no assigned courier")]
    NoCourier(OrderId),
    /// The order has no resolved destination.
    #[error("order {0} has no destination coordinates")]
    NoDestination(OrderId),
    /// The assigned courier does not exist.
    #[error("courier {courier} assigned to order {order} does not exist")]
    UnknownCourier {
        /// Order id.
        order: OrderId,
        /// Missing courier id.
        courier: CourierId,
    },
}

/// Errors from [`crate::MovementSimulator::tick`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickError {
    /// The order cannot be simulated.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    /// The route could not be created.
    #[error(transparent)]
    Route(#[from] RouteStoreError),
    /// Reading or writing the directory failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Errors from [`crate::TrackingReporter::report`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    /// The directory does not know the order.
    #[error("order {0} does not exist")]
    UnknownOrder(OrderId),
    /// Reading the directory failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

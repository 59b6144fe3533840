//! Shared fixtures for the tracker integration tests.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;

use waypost_core::test_support::{StubGeocoder, StubRoutePlanner};
use waypost_core::{
    Coordinates, CourierId, CourierSnapshot, InMemoryDirectory, OrderId, OrderSnapshot,
    OrderStatus, RestaurantId, RestaurantSnapshot, VehicleType,
};
use waypost_tracker::{MovementSimulator, RouteStateStore, SimulatorConfig};

pub type TestStore = RouteStateStore<InMemoryDirectory, StubRoutePlanner, StubGeocoder>;
pub type TestSimulator = MovementSimulator<InMemoryDirectory, StubRoutePlanner, StubGeocoder>;

pub const ORDER: OrderId = OrderId(1);
pub const COURIER: CourierId = CourierId(7);
pub const RESTAURANT: RestaurantId = RestaurantId(3);
pub const RESTAURANT_ADDRESS: &str = "Praça da Sé, São Paulo";

/// Praça da Sé, the restaurant in every scenario.
pub fn se() -> Coordinates {
    Coordinates::from_degrees(-23.5505, -46.6333).expect("valid coordinates")
}

/// Avenida Paulista, the customer in every scenario.
pub fn paulista() -> Coordinates {
    Coordinates::from_degrees(-23.5631, -46.6542).expect("valid coordinates")
}

pub fn restaurant(coordinates: Option<Coordinates>) -> RestaurantSnapshot {
    RestaurantSnapshot {
        id: RESTAURANT,
        address: RESTAURANT_ADDRESS.to_owned(),
        coordinates,
    }
}

pub fn order(id: OrderId, status: OrderStatus, courier: Option<CourierId>) -> OrderSnapshot {
    OrderSnapshot {
        id,
        status,
        courier_id: courier,
        destination: Some(paulista()),
        restaurant: restaurant(Some(se())),
    }
}

pub fn courier(id: CourierId, vehicle: VehicleType, position: Option<Coordinates>) -> CourierSnapshot {
    CourierSnapshot {
        id,
        vehicle,
        position,
    }
}

/// Simulator settings with a fixed seed and no speed variance.
pub fn steady() -> SimulatorConfig {
    SimulatorConfig::default()
        .with_seed(7)
        .with_speed_jitter(0.0)
}

pub struct Harness {
    pub directory: Arc<InMemoryDirectory>,
    pub store: Arc<TestStore>,
    pub simulator: Arc<TestSimulator>,
}

impl Harness {
    pub fn new(planner: StubRoutePlanner, config: SimulatorConfig) -> Self {
        let directory = Arc::new(InMemoryDirectory::default());
        let geocoder = StubGeocoder::with_entries([(RESTAURANT_ADDRESS, se())]);
        let store = Arc::new(RouteStateStore::new(
            Arc::clone(&directory),
            planner,
            geocoder,
        ));
        let simulator = Arc::new(MovementSimulator::new(Arc::clone(&store), config));
        Self {
            directory,
            store,
            simulator,
        }
    }

    /// One motorcycle delivery from Sé to Paulista, courier waiting at the
    /// restaurant.
    pub fn with_motorcycle_delivery(self) -> Self {
        self.directory
            .insert_order(order(ORDER, OrderStatus::OutForDelivery, Some(COURIER)));
        self.directory
            .insert_courier(courier(COURIER, VehicleType::Motorcycle, Some(se())));
        self
    }

    pub fn position(&self) -> Option<Coordinates> {
        self.directory.courier_position(COURIER)
    }
}

//! Integration tests for [`MovementSimulator::tick`].

mod support;

use std::sync::Arc;

use async_trait::async_trait;
use rstest::rstest;
use tokio::sync::Notify;
use waypost_core::test_support::{StubGeocoder, StubRoutePlanner};
use waypost_core::{
    Coordinates, CourierId, InMemoryDirectory, OrderId, OrderStatus, PlanningError, RoutePlanner,
    RouteResult, VehicleType,
};
use waypost_tracker::{
    MovementSimulator, PreconditionError, RouteStateStore, RouteStoreError, SimulatorConfig,
    TickError, TickOutcome,
};

use support::{COURIER, Harness, ORDER, courier, order, paulista, se, steady};

#[rstest]
#[tokio::test]
async fn walks_waypoints_then_arrives() {
    let harness = Harness::new(StubRoutePlanner::straight_line(4), steady())
        .with_motorcycle_delivery();

    let mut outcomes = Vec::new();
    for _ in 0..6 {
        outcomes.push(harness.simulator.tick(ORDER).await.expect("tick succeeds"));
    }

    assert_eq!(
        outcomes,
        vec![
            TickOutcome::ReachedWaypoint { index: 0 },
            TickOutcome::ReachedWaypoint { index: 1 },
            TickOutcome::ReachedWaypoint { index: 2 },
            TickOutcome::ReachedWaypoint { index: 3 },
            TickOutcome::SnappedToDestination,
            TickOutcome::Arrived,
        ]
    );
    assert_eq!(harness.position(), Some(paulista()));
    assert!(harness.store.is_complete(ORDER).await);
}

#[rstest]
#[tokio::test]
async fn long_leg_is_covered_over_several_ticks() {
    // 30 km/h for 10 s at 10x covers 0.83 km per tick.
    let harness = Harness::new(StubRoutePlanner::straight_line(1), steady())
        .with_motorcycle_delivery();

    assert_eq!(
        harness.simulator.tick(ORDER).await.expect("tick succeeds"),
        TickOutcome::ReachedWaypoint { index: 0 }
    );
    let moved = harness.simulator.tick(ORDER).await.expect("tick succeeds");
    let TickOutcome::Moved { remaining_km } = moved else {
        panic!("expected a partial move, got {moved:?}");
    };
    assert!((remaining_km - 1.72).abs() < 0.02, "remaining {remaining_km}");

    let position = harness.position().expect("courier has a position");
    let covered = se().distance_km(&position);
    assert!((covered - 0.833).abs() < 0.01, "covered {covered}");
}

#[rstest]
#[case(-5.0)]
#[case(0.0)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
#[tokio::test]
async fn unusable_acceleration_runs_in_real_time(#[case] acceleration: f64) {
    // 30 km/h for 10 s covers 0.083 km per tick.
    let config = SimulatorConfig {
        acceleration,
        ..steady()
    };
    let harness = Harness::new(StubRoutePlanner::straight_line(1), config)
        .with_motorcycle_delivery();
    assert!((harness.simulator.config().acceleration - 1.0).abs() < f64::EPSILON);

    assert_eq!(
        harness.simulator.tick(ORDER).await.expect("tick succeeds"),
        TickOutcome::ReachedWaypoint { index: 0 }
    );
    let moved = harness.simulator.tick(ORDER).await.expect("tick succeeds");
    let TickOutcome::Moved { remaining_km } = moved else {
        panic!("expected a partial move, got {moved:?}");
    };
    assert!((remaining_km - 2.47).abs() < 0.02, "remaining {remaining_km}");
}

#[rstest]
#[case(-1.0, 1.0)]
#[case(f64::NAN, 1.0)]
#[case(2.5, 2.5)]
fn acceleration_builder_sanitises(#[case] input: f64, #[case] expected: f64) {
    let config = SimulatorConfig::default().with_acceleration(input);
    assert!((config.acceleration - expected).abs() < f64::EPSILON);
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(99)]
#[tokio::test]
async fn jittered_courier_converges(#[case] seed: u64) {
    let config = SimulatorConfig::default().with_seed(seed);
    let harness = Harness::new(StubRoutePlanner::straight_line(8), config)
        .with_motorcycle_delivery();

    let mut arrived_after = None;
    for tick in 1..=20 {
        if harness.simulator.tick(ORDER).await.expect("tick succeeds") == TickOutcome::Arrived {
            arrived_after = Some(tick);
            break;
        }
    }

    assert!(arrived_after.is_some(), "courier never arrived");
    assert_eq!(harness.position(), Some(paulista()));
}

#[rstest]
#[tokio::test]
async fn arrival_is_stable() {
    let harness = Harness::new(StubRoutePlanner::straight_line(2), steady())
        .with_motorcycle_delivery();
    while harness.simulator.tick(ORDER).await.expect("tick succeeds") != TickOutcome::Arrived {}
    let calls = harness.store.planner().calls();

    for _ in 0..3 {
        assert_eq!(
            harness.simulator.tick(ORDER).await.expect("tick succeeds"),
            TickOutcome::Arrived
        );
    }
    assert_eq!(harness.position(), Some(paulista()));
    assert_eq!(harness.store.planner().calls(), calls);
}

#[rstest]
#[tokio::test]
async fn plans_the_route_once() {
    let harness = Harness::new(StubRoutePlanner::straight_line(4), steady())
        .with_motorcycle_delivery();

    for _ in 0..3 {
        harness.simulator.tick(ORDER).await.expect("tick succeeds");
    }

    assert_eq!(harness.store.planner().calls(), 1);
}

fn without_courier() -> Harness {
    let harness = Harness::new(StubRoutePlanner::straight_line(4), steady());
    harness
        .directory
        .insert_order(order(ORDER, OrderStatus::OutForDelivery, None));
    harness
}

fn without_destination() -> Harness {
    let harness = Harness::new(StubRoutePlanner::straight_line(4), steady());
    let mut pending = order(ORDER, OrderStatus::OutForDelivery, Some(COURIER));
    pending.destination = None;
    harness.directory.insert_order(pending);
    harness
        .directory
        .insert_courier(courier(COURIER, VehicleType::Car, Some(se())));
    harness
}

fn preparing() -> Harness {
    let harness = Harness::new(StubRoutePlanner::straight_line(4), steady())
        .with_motorcycle_delivery();
    harness.directory.set_status(ORDER, OrderStatus::Preparing);
    harness
}

fn missing_courier() -> Harness {
    let harness = Harness::new(StubRoutePlanner::straight_line(4), steady());
    harness
        .directory
        .insert_order(order(ORDER, OrderStatus::OutForDelivery, Some(COURIER)));
    harness
}

#[rstest]
#[case::unknown_order(
    Harness::new(StubRoutePlanner::straight_line(4), steady()),
    PreconditionError::UnknownOrder(ORDER)
)]
#[case::not_in_delivery(
    preparing(),
    PreconditionError::NotInDelivery { order: ORDER, status: OrderStatus::Preparing }
)]
#[case::no_courier(without_courier(), PreconditionError::NoCourier(ORDER))]
#[case::no_destination(without_destination(), PreconditionError::NoDestination(ORDER))]
#[case::unknown_courier(
    missing_courier(),
    PreconditionError::UnknownCourier { order: ORDER, courier: COURIER }
)]
#[tokio::test]
async fn rejects_orders_that_cannot_move(
    #[case] harness: Harness,
    #[case] expected: PreconditionError,
) {
    let before = harness.position();

    let err = harness
        .simulator
        .tick(ORDER)
        .await
        .expect_err("tick should be rejected");

    assert_eq!(err, TickError::Precondition(expected));
    assert_eq!(harness.position(), before);
    assert_eq!(harness.store.planner().calls(), 0);
    assert!(harness.store.is_empty());
}

#[rstest]
#[tokio::test]
async fn courier_without_position_starts_at_restaurant() {
    let harness = Harness::new(StubRoutePlanner::straight_line(4), steady());
    harness
        .directory
        .insert_order(order(ORDER, OrderStatus::OutForDelivery, Some(COURIER)));
    harness
        .directory
        .insert_courier(courier(COURIER, VehicleType::Bicycle, None));

    let outcome = harness.simulator.tick(ORDER).await.expect("tick succeeds");

    assert_eq!(outcome, TickOutcome::ReachedWaypoint { index: 0 });
    assert_eq!(harness.position(), Some(se()));
    let route = harness.store.route(ORDER).await.expect("route stored");
    assert_eq!(route.origin(), Some(se()));
}

#[rstest]
#[tokio::test]
async fn unresolved_restaurant_is_geocoded_for_the_start() {
    let harness = Harness::new(StubRoutePlanner::straight_line(4), steady());
    let mut pending = order(ORDER, OrderStatus::OutForDelivery, Some(COURIER));
    pending.restaurant.coordinates = None;
    harness.directory.insert_order(pending);
    harness
        .directory
        .insert_courier(courier(COURIER, VehicleType::Car, None));

    harness.simulator.tick(ORDER).await.expect("tick succeeds");

    assert_eq!(harness.position(), Some(se()));
    assert_eq!(
        harness.directory.restaurant_coordinates(support::RESTAURANT),
        Some(se())
    );
}

#[rstest]
#[tokio::test]
async fn planning_failure_surfaces_as_route_error() {
    let harness = Harness::new(
        StubRoutePlanner::with_error(PlanningError::NoRoute),
        steady(),
    )
    .with_motorcycle_delivery();

    let err = harness
        .simulator
        .tick(ORDER)
        .await
        .expect_err("tick should fail");

    assert!(
        matches!(
            err,
            TickError::Route(RouteStoreError::Planning {
                order: ORDER,
                source: PlanningError::NoRoute
            })
        ),
        "unexpected error {err:?}"
    );
    assert_eq!(harness.position(), Some(se()));
}

/// Planner that holds every call until released.
#[derive(Debug, Default)]
struct GatedPlanner {
    gate: Notify,
}

#[async_trait]
impl RoutePlanner for GatedPlanner {
    async fn plan(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        _vehicle: VehicleType,
        _include_waypoints: bool,
    ) -> Result<RouteResult, PlanningError> {
        self.gate.notified().await;
        Ok(RouteResult {
            distance_km: rust_decimal::Decimal::ONE,
            duration_minutes: 2,
            waypoints: Some(vec![origin, destination]),
        })
    }
}

#[rstest]
#[tokio::test]
async fn overlapping_tick_is_skipped() {
    let directory = Arc::new(InMemoryDirectory::default());
    directory.insert_order(order(OrderId(5), OrderStatus::OutForDelivery, Some(CourierId(2))));
    directory.insert_courier(courier(CourierId(2), VehicleType::Motorcycle, Some(se())));
    let store = Arc::new(RouteStateStore::new(
        Arc::clone(&directory),
        GatedPlanner::default(),
        StubGeocoder::default(),
    ));
    let simulator = MovementSimulator::new(Arc::clone(&store), steady());

    let (first, second) = tokio::join!(simulator.tick(OrderId(5)), async {
        tokio::task::yield_now().await;
        let outcome = simulator.tick(OrderId(5)).await;
        store.planner().gate.notify_one();
        outcome
    });

    assert_eq!(
        first.expect("first tick succeeds"),
        TickOutcome::ReachedWaypoint { index: 0 }
    );
    assert_eq!(second.expect("second tick skips"), TickOutcome::InFlight);

    // The claim is released once the first tick finishes; the route exists
    // so the planner is not consulted again.
    let third = simulator.tick(OrderId(5)).await.expect("third tick runs");
    assert_ne!(third, TickOutcome::InFlight);
}

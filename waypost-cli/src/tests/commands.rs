//! Command execution against stubbed and mocked providers.

use super::helpers::{PAULISTA, SE, SE_ADDRESS, geocoder, output_lines, paulista, se};
use super::*;
use crate::location::Providers;
use crate::resolve::execute_resolve;
use crate::route::{RouteConfig, execute_route};
use crate::simulate::{SimulateConfig, SimulationStep, execute_simulate};
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use waypost_core::test_support::StubRoutePlanner;
use waypost_core::{Coordinates, PlanningError, RouteResult, VehicleType};
use waypost_data::{HttpRoutePlanner, RoutePlannerConfig};
use waypost_tracker::{RouteStoreError, SimulatorConfig, TickError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn providers() -> Providers {
    Providers::from_overrides(None, None, None)
}

fn route_config(from: &str, to: &str, waypoints: bool) -> RouteConfig {
    RouteConfig {
        from: from.to_owned(),
        to: to.to_owned(),
        vehicle: VehicleType::Motorcycle,
        waypoints,
        providers: providers(),
    }
}

fn simulate_config(ticks: u32) -> SimulateConfig {
    SimulateConfig {
        from: SE.to_owned(),
        to: PAULISTA.to_owned(),
        vehicle: VehicleType::Motorcycle,
        ticks,
        simulator: SimulatorConfig::default().with_seed(3),
        providers: providers(),
    }
}

#[rstest]
#[tokio::test]
async fn resolve_prints_geocoded_coordinates() {
    let geocoder = geocoder();
    let mut stdout = Vec::new();

    execute_resolve(SE_ADDRESS, &geocoder, &mut stdout)
        .await
        .expect("resolve succeeds");

    let printed: Value = serde_json::from_slice(&stdout).expect("JSON output");
    assert_eq!(printed["query"], SE_ADDRESS);
    let coordinates: Coordinates =
        serde_json::from_value(printed["coordinates"].clone()).expect("coordinates");
    assert_eq!(coordinates, se());
    assert_eq!(geocoder.calls(), 1);
}

#[rstest]
#[tokio::test]
async fn resolve_accepts_literal_pairs_without_geocoding() {
    let geocoder = geocoder();
    let mut stdout = Vec::new();

    execute_resolve(PAULISTA, &geocoder, &mut stdout)
        .await
        .expect("resolve succeeds");

    let printed: Value = serde_json::from_slice(&stdout).expect("JSON output");
    let coordinates: Coordinates =
        serde_json::from_value(printed["coordinates"].clone()).expect("coordinates");
    assert_eq!(coordinates, paulista());
    assert_eq!(geocoder.calls(), 0);
}

#[rstest]
#[tokio::test]
async fn resolve_reports_unknown_places() {
    let mut stdout = Vec::new();

    let err = execute_resolve("Atlantis", &geocoder(), &mut stdout)
        .await
        .expect_err("nothing to resolve");

    match err {
        CliError::Unresolved { field, query } => {
            assert_eq!(field, ARG_QUERY);
            assert_eq!(query, "Atlantis");
        }
        other => panic!("expected Unresolved, found {other:?}"),
    }
    assert!(stdout.is_empty());
}

#[rstest]
#[case(false, None)]
#[case(true, Some(3))]
#[tokio::test]
async fn route_prints_planned_result(#[case] waypoints: bool, #[case] expected: Option<usize>) {
    let planner = StubRoutePlanner::straight_line(2);
    let mut stdout = Vec::new();

    execute_route(
        &route_config(SE_ADDRESS, PAULISTA, waypoints),
        &planner,
        &geocoder(),
        &mut stdout,
    )
    .await
    .expect("route succeeds");

    let route: RouteResult = serde_json::from_slice(&stdout).expect("JSON route");
    assert_eq!(route.distance_km, Decimal::new(255, 2));
    assert_eq!(route.duration_minutes, 6);
    assert_eq!(route.waypoints.map(|points| points.len()), expected);
}

#[rstest]
#[tokio::test]
async fn route_fails_for_unresolved_destination() {
    let planner = StubRoutePlanner::straight_line(2);
    let mut stdout = Vec::new();

    let err = execute_route(
        &route_config(SE, "Atlantis", false),
        &planner,
        &geocoder(),
        &mut stdout,
    )
    .await
    .expect_err("destination is unknown");

    assert!(matches!(err, CliError::Unresolved { field: ARG_TO, .. }));
    assert_eq!(planner.calls(), 0);
}

#[rstest]
#[tokio::test]
async fn route_queries_the_routing_engine() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/route/v1/driving/-46.6333,-23.5505;-46.6542,-23.5631",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "routes": [{"distance": 3456.0, "duration": 601.0}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let planner = HttpRoutePlanner::with_config(RoutePlannerConfig::new(server.uri()))
        .expect("planner should build");
    let mut stdout = Vec::new();

    execute_route(
        &route_config(SE, PAULISTA, false),
        &planner,
        &geocoder(),
        &mut stdout,
    )
    .await
    .expect("route succeeds");

    let route: RouteResult = serde_json::from_slice(&stdout).expect("JSON route");
    assert_eq!(route.distance_km, Decimal::new(346, 2));
    assert_eq!(route.duration_minutes, 11);
}

#[rstest]
#[tokio::test]
async fn route_surfaces_planning_errors() {
    let planner = StubRoutePlanner::with_error(PlanningError::NoRoute);
    let mut stdout = Vec::new();

    let err = execute_route(
        &route_config(SE, PAULISTA, false),
        &planner,
        &geocoder(),
        &mut stdout,
    )
    .await
    .expect_err("planning fails");

    match err {
        CliError::Plan { source } => assert_eq!(source, PlanningError::NoRoute),
        other => panic!("expected Plan, found {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn simulate_rides_until_arrival() {
    let mut stdout = Vec::new();

    execute_simulate(
        &simulate_config(50),
        StubRoutePlanner::straight_line(4),
        geocoder(),
        &mut stdout,
    )
    .await
    .expect("simulation succeeds");

    let steps: Vec<SimulationStep> = output_lines(&stdout)
        .iter()
        .map(|line| serde_json::from_str(line).expect("JSON step"))
        .collect();
    let events: Vec<&str> = steps.iter().map(|step| step.event.as_str()).collect();
    assert_eq!(
        events,
        [
            "reached_waypoint_0",
            "reached_waypoint_1",
            "reached_waypoint_2",
            "reached_waypoint_3",
            "snapped_to_destination",
            "arrived",
        ]
    );
    let last = steps.last().expect("at least one step");
    assert_eq!(last.tick, 6);
    assert_eq!(last.position, Some(paulista()));
}

#[rstest]
#[tokio::test]
async fn simulate_stops_at_the_tick_budget() {
    let mut stdout = Vec::new();

    execute_simulate(
        &simulate_config(2),
        StubRoutePlanner::straight_line(1),
        geocoder(),
        &mut stdout,
    )
    .await
    .expect("simulation succeeds");

    let lines = output_lines(&stdout);
    assert_eq!(lines.len(), 2);
    let last: SimulationStep = serde_json::from_str(&lines[1]).expect("JSON step");
    assert_eq!(last.event, "moved");
    assert!(last.remaining_km.is_some_and(|km| km > 0.0));
}

#[rstest]
#[tokio::test]
async fn simulate_reports_the_failing_tick() {
    let mut stdout = Vec::new();

    let err = execute_simulate(
        &simulate_config(5),
        StubRoutePlanner::with_error(PlanningError::NoRoute),
        geocoder(),
        &mut stdout,
    )
    .await
    .expect_err("planning fails");

    match err {
        CliError::Tick {
            tick,
            source: TickError::Route(RouteStoreError::Planning { .. }),
        } => assert_eq!(tick, 1),
        other => panic!("expected Tick, found {other:?}"),
    }
    assert!(stdout.is_empty());
}

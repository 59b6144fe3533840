//! Deterministic test doubles for the engine's seams.
//!
//! [`StubRoutePlanner`] and [`StubGeocoder`] answer without touching the
//! network and count how often they were called, so tests can assert on
//! idempotence and fallbacks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{Coordinates, Geocoder, PlanningError, RoutePlanner, RouteResult, VehicleType};

#[derive(Debug, Clone)]
enum PlannerResponse {
    StraightLine { segments: usize },
    Fixed(RouteResult),
    Error(PlanningError),
}

/// Stub `RoutePlanner` for testing.
///
/// # Example
///
/// ```
/// use waypost_core::test_support::StubRoutePlanner;
///
/// let planner = StubRoutePlanner::straight_line(4);
/// assert_eq!(planner.calls(), 0);
/// ```
#[derive(Debug)]
pub struct StubRoutePlanner {
    response: PlannerResponse,
    calls: AtomicUsize,
}

impl StubRoutePlanner {
    /// Plan a straight line split into `segments` equal legs.
    ///
    /// Distance is the great-circle distance; duration assumes the vehicle's
    /// base speed.
    #[must_use]
    pub fn straight_line(segments: usize) -> Self {
        Self::with_response(PlannerResponse::StraightLine {
            segments: segments.max(1),
        })
    }

    /// Return the same result for every call.
    #[must_use]
    pub fn with_result(result: RouteResult) -> Self {
        Self::with_response(PlannerResponse::Fixed(result))
    }

    /// Fail every call with `error`.
    #[must_use]
    pub fn with_error(error: PlanningError) -> Self {
        Self::with_response(PlannerResponse::Error(error))
    }

    const fn with_response(response: PlannerResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `plan` calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutePlanner for StubRoutePlanner {
    async fn plan(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        vehicle: VehicleType,
        include_waypoints: bool,
    ) -> Result<RouteResult, PlanningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            PlannerResponse::StraightLine { segments } => Ok(straight_line_result(
                origin,
                destination,
                vehicle,
                *segments,
                include_waypoints,
            )),
            PlannerResponse::Fixed(result) => Ok(result.clone()),
            PlannerResponse::Error(error) => Err(error.clone()),
        }
    }
}

fn straight_line_result(
    origin: Coordinates,
    destination: Coordinates,
    vehicle: VehicleType,
    segments: usize,
    include_waypoints: bool,
) -> RouteResult {
    let km = origin.distance_km(&destination);
    let distance_km = Decimal::from_f64(km)
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let minutes = Decimal::from_f64(km / vehicle.base_speed_kmh() * 60.0)
        .unwrap_or_default()
        .ceil();
    let waypoints = include_waypoints.then(|| {
        (0..=segments)
            .map(|step| {
                let fraction = f64::from(u32::try_from(step).unwrap_or(u32::MAX))
                    / f64::from(u32::try_from(segments).unwrap_or(u32::MAX));
                origin.interpolate(&destination, fraction)
            })
            .collect()
    });
    RouteResult {
        distance_km,
        duration_minutes: minutes.to_u32().unwrap_or(u32::MAX),
        waypoints,
    }
}

/// Stub `Geocoder` answering from a fixed table.
#[derive(Debug, Default)]
pub struct StubGeocoder {
    known: HashMap<String, Coordinates>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    /// Create a geocoder that knows `entries`. Keys are matched after
    /// trimming the query.
    #[must_use]
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinates)>,
        S: Into<String>,
    {
        Self {
            known: entries
                .into_iter()
                .map(|(query, coords)| (query.into(), coords))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `resolve` calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, query: &str) -> Option<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.known.get(query.trim()).copied()
    }
}

//! HTTP-based `RoutePlanner` using OSRM's Route API.
//!
//! This module provides [`HttpRoutePlanner`], an implementation of the
//! [`RoutePlanner`] trait that fetches a road route between two coordinates
//! from an OSRM routing service.
//!
//! # Retry policy
//!
//! Each call makes up to [`RoutePlannerConfig::max_retries`] attempts.
//! Transient failures (network errors, timeouts, HTTP 5xx) are retried after
//! `base_delay * attempt`; anything else aborts immediately. When every
//! attempt fails the last error is wrapped in
//! [`PlanningError::RetriesExhausted`].
//!
//! # Example
//!
//! ```no_run
//! use waypost_data::routing::HttpRoutePlanner;
//! use waypost_core::{Coordinates, RoutePlanner, VehicleType};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = HttpRoutePlanner::new("http://localhost:5000")?;
//! let origin = Coordinates::from_degrees(-23.5505, -46.6333)?;
//! let destination = Coordinates::from_degrees(-23.5631, -46.6542)?;
//!
//! let route = planner
//!     .plan(origin, destination, VehicleType::Motorcycle, false)
//!     .await?;
//! println!("{} km in {} min", route.distance_km, route.duration_minutes);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use waypost_core::{Coordinates, PlanningError, RoutePlanner, RouteResult, VehicleType};

use super::osrm::{OsrmRoute, RouteResponse};
use crate::error::ProviderBuildError;

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "waypost-routing/0.1";

/// Default routing engine base URL.
pub const DEFAULT_ROUTING_URL: &str = "http://router.project-osrm.org";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default number of attempts per planning call.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry.
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

const METRES_PER_KM: Decimal = Decimal::ONE_THOUSAND;
const SECONDS_PER_MINUTE: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Geometry encoding requested from the routing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryFormat {
    /// GeoJSON `LineString` coordinate arrays.
    #[default]
    GeoJson,
    /// Encoded polyline with five decimal places.
    Polyline,
    /// Encoded polyline with six decimal places.
    Polyline6,
}

impl GeometryFormat {
    /// Value of the `geometries` query parameter.
    #[must_use]
    pub const fn query_value(self) -> &'static str {
        match self {
            Self::GeoJson => "geojson",
            Self::Polyline => "polyline",
            Self::Polyline6 => "polyline6",
        }
    }

    /// Decimal places used when decoding an encoded polyline.
    #[must_use]
    pub const fn precision(self) -> u32 {
        match self {
            Self::Polyline6 => 6,
            Self::GeoJson | Self::Polyline => 5,
        }
    }
}

/// Configuration for [`HttpRoutePlanner`].
#[derive(Debug, Clone)]
pub struct RoutePlannerConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Maximum number of attempts per call, including the first.
    pub max_retries: u32,
    /// Delay multiplied by the attempt number between retries.
    pub base_delay: Duration,
    /// Geometry encoding to request when waypoints are wanted.
    pub geometry: GeometryFormat,
}

impl Default for RoutePlannerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ROUTING_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            geometry: GeometryFormat::default(),
        }
    }
}

impl RoutePlannerConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the maximum number of attempts. Zero is treated as one.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the linear backoff base delay.
    #[must_use]
    pub const fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the geometry encoding.
    #[must_use]
    pub const fn with_geometry(mut self, geometry: GeometryFormat) -> Self {
        self.geometry = geometry;
        self
    }
}

/// HTTP-based route planner using the OSRM Route API.
#[derive(Debug, Clone)]
pub struct HttpRoutePlanner {
    client: Client,
    config: RoutePlannerConfig,
}

impl HttpRoutePlanner {
    /// Create a new planner with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(RoutePlannerConfig::new(base_url))
    }

    /// Create a new planner with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: RoutePlannerConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self { client, config })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RoutePlannerConfig {
        &self.config
    }

    /// Build the OSRM Route API URL.
    ///
    /// The URL format is: `{base_url}/route/v1/{profile}/{lon,lat;lon,lat}`
    /// followed by the `overview` and `geometries` query flags.
    fn build_route_url(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        vehicle: VehicleType,
        include_waypoints: bool,
    ) -> String {
        let overview = if include_waypoints { "full" } else { "false" };
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview={}&geometries={}",
            self.config.base_url.trim_end_matches('/'),
            vehicle.routing_profile(),
            origin.longitude().normalize(),
            origin.latitude().normalize(),
            destination.longitude().normalize(),
            destination.latitude().normalize(),
            overview,
            self.config.geometry.query_value(),
        )
    }

    /// Make a single request and shape its answer.
    async fn fetch_route(
        &self,
        url: &str,
        include_waypoints: bool,
    ) -> Result<RouteResult, PlanningError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        // Body reads can still time out or drop; only the JSON itself is a
        // parse error.
        let body = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        let route_response: RouteResponse =
            serde_json::from_slice(&body).map_err(|err| PlanningError::ParseError {
                message: err.to_string(),
            })?;

        self.convert_response(route_response, include_waypoints)
    }

    /// Convert a reqwest error to a `PlanningError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> PlanningError {
        if error.is_timeout() {
            return PlanningError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return PlanningError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return PlanningError::ParseError {
                message: error.to_string(),
            };
        }

        PlanningError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Convert an OSRM response to a `RouteResult`.
    fn convert_response(
        &self,
        response: RouteResponse,
        include_waypoints: bool,
    ) -> Result<RouteResult, PlanningError> {
        if !response.is_ok() {
            if response.code == "NoRoute" {
                return Err(PlanningError::NoRoute);
            }
            return Err(PlanningError::ServiceError {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        let OsrmRoute {
            distance,
            duration,
            geometry,
        } = response
            .routes
            .into_iter()
            .next()
            .ok_or(PlanningError::NoRoute)?;

        let waypoints = if include_waypoints {
            let waypoints = geometry
                .ok_or(PlanningError::MissingGeometry)?
                .into_waypoints(self.config.geometry.precision())
                .map_err(|err| PlanningError::ParseError {
                    message: err.to_string(),
                })?;
            if waypoints.len() < 2 {
                return Err(PlanningError::MissingGeometry);
            }
            Some(waypoints)
        } else {
            None
        };

        Ok(RouteResult {
            distance_km: metres_to_km(distance)?,
            duration_minutes: seconds_to_minutes(duration)?,
            waypoints,
        })
    }
}

/// Metres to kilometres, rounded half away from zero to two places.
fn metres_to_km(metres: f64) -> Result<Decimal, PlanningError> {
    let metres = finite_non_negative(metres, "distance")?;
    Ok((metres / METRES_PER_KM).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Seconds to whole minutes, rounded up.
fn seconds_to_minutes(seconds: f64) -> Result<u32, PlanningError> {
    let seconds = finite_non_negative(seconds, "duration")?;
    (seconds / SECONDS_PER_MINUTE)
        .ceil()
        .to_u32()
        .ok_or_else(|| PlanningError::ParseError {
            message: format!("duration {seconds}s is out of range"),
        })
}

fn finite_non_negative(value: f64, field: &str) -> Result<Decimal, PlanningError> {
    Decimal::from_f64(value)
        .filter(|decimal| !decimal.is_sign_negative())
        .ok_or_else(|| PlanningError::ParseError {
            message: format!("invalid {field} {value} in routing response"),
        })
}

#[async_trait]
impl RoutePlanner for HttpRoutePlanner {
    async fn plan(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        vehicle: VehicleType,
        include_waypoints: bool,
    ) -> Result<RouteResult, PlanningError> {
        let url = self.build_route_url(origin, destination, vehicle, include_waypoints);
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let err = match self.fetch_route(&url, include_waypoints).await {
                Ok(route) => return Ok(route),
                Err(err) => err,
            };

            log::warn!(
                "routing attempt {attempt}/{max_attempts} to {url} failed (status {:?}): {err}",
                err.status()
            );

            if !err.is_transient() {
                return Err(err);
            }
            if attempt >= max_attempts {
                log::warn!("routing to {url} gave up after {attempt} attempt(s)");
                return Err(PlanningError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }
            tokio::time::sleep(self.config.base_delay.saturating_mul(attempt)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::osrm::Geometry;
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    #[fixture]
    fn planner() -> HttpRoutePlanner {
        HttpRoutePlanner::new("http://osrm.example.com").expect("planner should build")
    }

    fn point(lat: f64, lon: f64) -> Coordinates {
        Coordinates::from_degrees(lat, lon).expect("valid coordinates")
    }

    fn ok_response(distance: f64, duration: f64, geometry: Option<Geometry>) -> RouteResponse {
        RouteResponse {
            code: "Ok".to_owned(),
            message: None,
            routes: vec![OsrmRoute {
                distance,
                duration,
                geometry,
            }],
        }
    }

    #[rstest]
    fn build_route_url_orders_longitude_first(planner: HttpRoutePlanner) {
        let url = planner.build_route_url(
            point(-23.5505, -46.6333),
            point(-23.5631, -46.6542),
            VehicleType::Motorcycle,
            true,
        );

        assert_eq!(
            url,
            "http://osrm.example.com/route/v1/driving/-46.6333,-23.5505;-46.6542,-23.5631\
             ?overview=full&geometries=geojson"
        );
    }

    #[rstest]
    fn build_route_url_uses_cycling_profile_and_skips_overview() {
        let planner = HttpRoutePlanner::with_config(
            RoutePlannerConfig::new("http://osrm.example.com/")
                .with_geometry(GeometryFormat::Polyline6),
        )
        .expect("planner should build");

        let url = planner.build_route_url(
            point(1.0, 2.0),
            point(3.0, 4.0),
            VehicleType::Bicycle,
            false,
        );

        assert_eq!(
            url,
            "http://osrm.example.com/route/v1/cycling/2,1;4,3?overview=false&geometries=polyline6"
        );
    }

    #[rstest]
    #[case(2500.0, 900.0, dec!(2.50), 15)]
    #[case(1234.0, 61.0, dec!(1.23), 2)]
    #[case(1235.0, 60.0, dec!(1.24), 1)]
    #[case(0.0, 0.0, dec!(0), 0)]
    fn convert_response_shapes_units(
        planner: HttpRoutePlanner,
        #[case] metres: f64,
        #[case] seconds: f64,
        #[case] km: Decimal,
        #[case] minutes: u32,
    ) {
        let result = planner
            .convert_response(ok_response(metres, seconds, None), false)
            .expect("should convert");

        assert_eq!(result.distance_km, km);
        assert_eq!(result.duration_minutes, minutes);
        assert!(result.waypoints.is_none());
    }

    #[rstest]
    fn convert_response_requires_geometry_for_waypoints(planner: HttpRoutePlanner) {
        let err = planner
            .convert_response(ok_response(1.0, 1.0, None), true)
            .expect_err("missing geometry should fail");

        assert_eq!(err, PlanningError::MissingGeometry);
    }

    #[rstest]
    fn convert_response_rejects_single_point_geometry(planner: HttpRoutePlanner) {
        let geometry = Geometry::LineString {
            coordinates: vec![[-46.6333, -23.5505]],
        };
        let err = planner
            .convert_response(ok_response(1.0, 1.0, Some(geometry)), true)
            .expect_err("single point cannot be walked");

        assert_eq!(err, PlanningError::MissingGeometry);
    }

    #[rstest]
    fn convert_response_maps_no_route(planner: HttpRoutePlanner) {
        let response = RouteResponse {
            code: "NoRoute".to_owned(),
            message: Some("Impossible route".to_owned()),
            routes: Vec::new(),
        };

        let err = planner
            .convert_response(response, false)
            .expect_err("should fail");

        assert_eq!(err, PlanningError::NoRoute);
    }

    #[rstest]
    fn convert_response_surfaces_service_errors(planner: HttpRoutePlanner) {
        let response = RouteResponse {
            code: "InvalidQuery".to_owned(),
            message: Some("bad coordinates".to_owned()),
            routes: Vec::new(),
        };

        let err = planner
            .convert_response(response, false)
            .expect_err("should fail");

        assert_eq!(
            err,
            PlanningError::ServiceError {
                code: "InvalidQuery".to_owned(),
                message: "bad coordinates".to_owned(),
            }
        );
    }

    #[rstest]
    fn convert_response_rejects_negative_distance(planner: HttpRoutePlanner) {
        let err = planner
            .convert_response(ok_response(-1.0, 1.0, None), false)
            .expect_err("should fail");

        assert!(matches!(err, PlanningError::ParseError { .. }));
    }

    #[rstest]
    fn config_builder_chains() {
        let config = RoutePlannerConfig::new("http://localhost:5000")
            .with_timeout(Duration::from_secs(2))
            .with_user_agent("test/1.0")
            .with_max_retries(5)
            .with_base_delay(Duration::from_millis(10))
            .with_geometry(GeometryFormat::Polyline);

        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.user_agent, "test/1.0");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay, Duration::from_millis(10));
        assert_eq!(config.geometry, GeometryFormat::Polyline);
    }
}

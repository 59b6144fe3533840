//! OSRM API response types for the Route service.
//!
//! This module provides deserialisation types for the OSRM Route API response
//! format. The Route API finds the fastest route between the supplied
//! coordinates and optionally returns its geometry.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;
use waypost_core::Coordinates;

use super::polyline;

/// OSRM Route API response.
///
/// The response contains one or more routes on success or an error message
/// on failure. The `code` field indicates the response status.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"InvalidQuery"` - Invalid query parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Candidate routes, fastest first.
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One route in an OSRM response.
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    /// Distance in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Route geometry, present when `overview` was not `false`.
    pub geometry: Option<Geometry>,
}

/// Route geometry as returned by OSRM.
///
/// The shape depends on the `geometries` query flag: GeoJSON yields a
/// `LineString` object, `polyline`/`polyline6` yield an encoded string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    /// GeoJSON `LineString` with `[longitude, latitude]` pairs.
    LineString {
        /// Coordinate pairs in `[lon, lat]` order.
        coordinates: Vec<[f64; 2]>,
    },
    /// Encoded polyline string.
    Encoded(String),
}

/// Errors converting a [`Geometry`] into waypoints.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// A GeoJSON position was not a valid coordinate.
    #[error("invalid position in route geometry: {0}")]
    InvalidPosition(#[from] waypost_core::CoordinatesError),
    /// The encoded polyline could not be decoded.
    #[error(transparent)]
    Polyline(#[from] polyline::PolylineError),
}

impl Geometry {
    /// Resolve either geometry form into a single waypoint sequence.
    pub fn into_waypoints(self, precision: u32) -> Result<Vec<Coordinates>, GeometryError> {
        match self {
            Self::LineString { coordinates } => coordinates
                .into_iter()
                .map(|[lon, lat]| Coordinates::from_degrees(lat, lon).map_err(GeometryError::from))
                .collect(),
            Self::Encoded(encoded) => Ok(polyline::decode(&encoded, precision)?),
        }
    }
}

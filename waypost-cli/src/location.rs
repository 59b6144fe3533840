//! Provider wiring and location parsing shared by the subcommands.

use std::str::FromStr;

use rust_decimal::Decimal;
use waypost_core::{Coordinates, Geocoder, VehicleType};
use waypost_data::{
    DEFAULT_GEOCODING_URL, DEFAULT_POSTAL_URL, DEFAULT_ROUTING_URL, GeocodingConfig,
    HttpCoordinateResolver, HttpRoutePlanner, RoutePlannerConfig,
};

use crate::CliError;

/// Base URLs of the external services, after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Providers {
    pub(crate) geocoding_url: String,
    pub(crate) postal_url: String,
    pub(crate) routing_url: String,
}

impl Providers {
    pub(crate) fn from_overrides(
        geocoding_url: Option<String>,
        postal_url: Option<String>,
        routing_url: Option<String>,
    ) -> Self {
        Self {
            geocoding_url: geocoding_url.unwrap_or_else(|| DEFAULT_GEOCODING_URL.to_owned()),
            postal_url: postal_url.unwrap_or_else(|| DEFAULT_POSTAL_URL.to_owned()),
            routing_url: routing_url.unwrap_or_else(|| DEFAULT_ROUTING_URL.to_owned()),
        }
    }

    pub(crate) fn resolver(&self) -> Result<HttpCoordinateResolver, CliError> {
        let config = GeocodingConfig::new(self.geocoding_url.clone(), self.postal_url.clone());
        HttpCoordinateResolver::with_config(config).map_err(|source| CliError::BuildProvider {
            provider: "geocoding",
            base_url: self.geocoding_url.clone(),
            source,
        })
    }

    pub(crate) fn planner(&self) -> Result<HttpRoutePlanner, CliError> {
        let config = RoutePlannerConfig::new(self.routing_url.clone());
        HttpRoutePlanner::with_config(config).map_err(|source| CliError::BuildProvider {
            provider: "routing",
            base_url: self.routing_url.clone(),
            source,
        })
    }
}

/// Parse an optional vehicle name, defaulting to a motorcycle.
pub(crate) fn parse_vehicle(vehicle: Option<&str>) -> Result<VehicleType, CliError> {
    vehicle.map_or(Ok(VehicleType::Motorcycle), |name| {
        VehicleType::from_str(name).map_err(CliError::from)
    })
}

/// Read a literal `lat,lon` pair.
pub(crate) fn parse_coordinates(text: &str) -> Option<Coordinates> {
    let (lat, lon) = text.split_once(',')?;
    let latitude = Decimal::from_str(lat.trim()).ok()?;
    let longitude = Decimal::from_str(lon.trim()).ok()?;
    Coordinates::new(latitude, longitude).ok()
}

/// Turn a `lat,lon` pair, postal code or address into coordinates.
pub(crate) async fn locate<G: Geocoder>(
    geocoder: &G,
    field: &'static str,
    query: &str,
) -> Result<Coordinates, CliError> {
    if let Some(coordinates) = parse_coordinates(query) {
        return Ok(coordinates);
    }
    geocoder
        .resolve(query)
        .await
        .ok_or_else(|| CliError::Unresolved {
            field,
            query: query.to_owned(),
        })
}

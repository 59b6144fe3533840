//! `route` command: plan a road route and print distance, duration and
//! optionally the waypoints.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waypost_core::{Geocoder, RoutePlanner, VehicleType};

use crate::location::{Providers, locate, parse_vehicle};
use crate::{
    ARG_FROM, ARG_GEOCODING_URL, ARG_POSTAL_URL, ARG_ROUTING_URL, ARG_TO, ARG_VEHICLE, CliError,
    ENV_ROUTE_FROM, ENV_ROUTE_TO, write_json,
};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "route",
    long_about = "Plan a road route between two locations. Each end may \
                 be an address, a postal code or a literal `lat,lon` \
                 pair. Prints the distance in km, the duration in whole \
                 minutes and, with --waypoints, the route geometry.",
    about = "Plan a road route"
)]
#[ortho_config(prefix = "WAYPOST")]
pub(crate) struct RouteArgs {
    /// Start of the route.
    #[arg(long = ARG_FROM, value_name = "location", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) from: Option<String>,
    /// End of the route.
    #[arg(long = ARG_TO, value_name = "location", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) to: Option<String>,
    /// Vehicle type (`moto`, `carro`, `bicicleta`); defaults to motorcycle.
    #[arg(long = ARG_VEHICLE, value_name = "type")]
    #[serde(default)]
    pub(crate) vehicle: Option<String>,
    /// Include the route geometry in the output.
    #[arg(long)]
    #[serde(default)]
    pub(crate) waypoints: bool,
    /// Base URL of the geocoding service.
    #[arg(long = ARG_GEOCODING_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoding_url: Option<String>,
    /// Base URL of the postal lookup service.
    #[arg(long = ARG_POSTAL_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) postal_url: Option<String>,
    /// Base URL of the routing engine (e.g. "http://localhost:5000").
    #[arg(long = ARG_ROUTING_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) routing_url: Option<String>,
}

impl RouteArgs {
    fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteConfig {
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) vehicle: VehicleType,
    pub(crate) waypoints: bool,
    pub(crate) providers: Providers,
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let from = args.from.ok_or(CliError::MissingArgument {
            field: ARG_FROM,
            env: ENV_ROUTE_FROM,
        })?;
        let to = args.to.ok_or(CliError::MissingArgument {
            field: ARG_TO,
            env: ENV_ROUTE_TO,
        })?;
        let vehicle = parse_vehicle(args.vehicle.as_deref())?;
        Ok(Self {
            from,
            to,
            vehicle,
            waypoints: args.waypoints,
            providers: Providers::from_overrides(
                args.geocoding_url,
                args.postal_url,
                args.routing_url,
            ),
        })
    }
}

pub(crate) async fn run_route(args: RouteArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let resolver = config.providers.resolver()?;
    let planner = config.providers.planner()?;
    execute_route(&config, &planner, &resolver, writer).await
}

pub(crate) async fn execute_route<P: RoutePlanner, G: Geocoder>(
    config: &RouteConfig,
    planner: &P,
    geocoder: &G,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let origin = locate(geocoder, ARG_FROM, &config.from).await?;
    let destination = locate(geocoder, ARG_TO, &config.to).await?;
    let route = planner
        .plan(origin, destination, config.vehicle, config.waypoints)
        .await
        .map_err(|source| CliError::Plan { source })?;
    write_json(writer, &route)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RouteConfig, CliError> {
    let merged = RouteArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RouteConfig::try_from(merged)
}

//! `simulate` command: ride a courier from one location to another against
//! an in-memory directory and print one JSON line per tick.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waypost_core::{
    Coordinates, CourierId, CourierSnapshot, Geocoder, InMemoryDirectory, OrderId, OrderSnapshot,
    OrderStatus, RestaurantId, RestaurantSnapshot, RoutePlanner, VehicleType,
};
use waypost_tracker::{MovementSimulator, RouteStateStore, SimulatorConfig, TickOutcome};

use crate::location::{Providers, locate, parse_vehicle};
use crate::{
    ARG_FROM, ARG_GEOCODING_URL, ARG_POSTAL_URL, ARG_ROUTING_URL, ARG_TO, ARG_VEHICLE, CliError,
    ENV_SIMULATE_FROM, ENV_SIMULATE_TO,
};

const DEFAULT_TICKS: u32 = 120;
const ORDER: OrderId = OrderId(1);
const COURIER: CourierId = CourierId(1);
const RESTAURANT: RestaurantId = RestaurantId(1);

/// CLI arguments for the `simulate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "simulate",
    long_about = "Plan a route between two locations and tick the movement \
                 simulator until the courier arrives or the tick budget \
                 runs out. Each tick prints the outcome and the courier's \
                 new position.",
    about = "Simulate a delivery"
)]
#[ortho_config(prefix = "WAYPOST")]
pub(crate) struct SimulateArgs {
    /// Restaurant location; the courier starts here.
    #[arg(long = ARG_FROM, value_name = "location", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) from: Option<String>,
    /// Customer location.
    #[arg(long = ARG_TO, value_name = "location", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) to: Option<String>,
    /// Vehicle type (`moto`, `carro`, `bicicleta`); defaults to motorcycle.
    #[arg(long = ARG_VEHICLE, value_name = "type")]
    #[serde(default)]
    pub(crate) vehicle: Option<String>,
    /// Maximum number of ticks to run.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) ticks: Option<u32>,
    /// Seed for the speed model.
    #[arg(long, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Distance multiplier per tick.
    #[arg(long, value_name = "factor")]
    #[serde(default)]
    pub(crate) acceleration: Option<f64>,
    /// Base URL of the geocoding service.
    #[arg(long = ARG_GEOCODING_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoding_url: Option<String>,
    /// Base URL of the postal lookup service.
    #[arg(long = ARG_POSTAL_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) postal_url: Option<String>,
    /// Base URL of the routing engine.
    #[arg(long = ARG_ROUTING_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) routing_url: Option<String>,
}

impl SimulateArgs {
    fn into_config(self) -> Result<SimulateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SimulateConfig::try_from(merged)
    }
}

/// Resolved `simulate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SimulateConfig {
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) vehicle: VehicleType,
    pub(crate) ticks: u32,
    pub(crate) simulator: SimulatorConfig,
    pub(crate) providers: Providers,
}

impl TryFrom<SimulateArgs> for SimulateConfig {
    type Error = CliError;

    fn try_from(args: SimulateArgs) -> Result<Self, Self::Error> {
        let from = args.from.ok_or(CliError::MissingArgument {
            field: ARG_FROM,
            env: ENV_SIMULATE_FROM,
        })?;
        let to = args.to.ok_or(CliError::MissingArgument {
            field: ARG_TO,
            env: ENV_SIMULATE_TO,
        })?;
        let vehicle = parse_vehicle(args.vehicle.as_deref())?;

        let mut simulator = SimulatorConfig::default();
        if let Some(seed) = args.seed {
            simulator = simulator.with_seed(seed);
        }
        if let Some(acceleration) = args.acceleration {
            simulator = simulator.with_acceleration(acceleration);
        }

        Ok(Self {
            from,
            to,
            vehicle,
            ticks: args.ticks.unwrap_or(DEFAULT_TICKS),
            simulator,
            providers: Providers::from_overrides(
                args.geocoding_url,
                args.postal_url,
                args.routing_url,
            ),
        })
    }
}

/// One line of simulation output.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct SimulationStep {
    pub(crate) tick: u32,
    pub(crate) event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) remaining_km: Option<f64>,
    pub(crate) position: Option<Coordinates>,
}

impl SimulationStep {
    fn new(tick: u32, outcome: TickOutcome, position: Option<Coordinates>) -> Self {
        let (event, remaining_km) = match outcome {
            TickOutcome::InFlight => ("in_flight".to_owned(), None),
            TickOutcome::Arrived => ("arrived".to_owned(), None),
            TickOutcome::SnappedToDestination => ("snapped_to_destination".to_owned(), None),
            TickOutcome::ReachedWaypoint { index } => (format!("reached_waypoint_{index}"), None),
            TickOutcome::Moved { remaining_km } => ("moved".to_owned(), Some(remaining_km)),
        };
        Self {
            tick,
            event,
            remaining_km,
            position,
        }
    }
}

pub(crate) async fn run_simulate(
    args: SimulateArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let resolver = config.providers.resolver()?;
    let planner = config.providers.planner()?;
    execute_simulate(&config, planner, resolver, writer).await
}

pub(crate) async fn execute_simulate<P: RoutePlanner, G: Geocoder>(
    config: &SimulateConfig,
    planner: P,
    geocoder: G,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let origin = locate(&geocoder, ARG_FROM, &config.from).await?;
    let destination = locate(&geocoder, ARG_TO, &config.to).await?;

    let directory = Arc::new(InMemoryDirectory::default());
    directory.insert_order(OrderSnapshot {
        id: ORDER,
        status: OrderStatus::OutForDelivery,
        courier_id: Some(COURIER),
        destination: Some(destination),
        restaurant: RestaurantSnapshot {
            id: RESTAURANT,
            address: config.from.clone(),
            coordinates: Some(origin),
        },
    });
    directory.insert_courier(CourierSnapshot {
        id: COURIER,
        vehicle: config.vehicle,
        position: Some(origin),
    });

    let store = Arc::new(RouteStateStore::new(
        Arc::clone(&directory),
        planner,
        geocoder,
    ));
    let simulator = MovementSimulator::new(store, config.simulator.clone());

    for tick in 1..=config.ticks {
        let outcome = simulator
            .tick(ORDER)
            .await
            .map_err(|source| CliError::Tick { tick, source })?;
        let step = SimulationStep::new(tick, outcome, directory.courier_position(COURIER));
        write_line(writer, &step)?;
        if outcome == TickOutcome::Arrived {
            break;
        }
    }
    Ok(())
}

fn write_line(writer: &mut dyn Write, step: &SimulationStep) -> Result<(), CliError> {
    let line = serde_json::to_string(step).map_err(CliError::SerialiseOutput)?;
    writeln!(writer, "{line}").map_err(CliError::WriteOutput)
}

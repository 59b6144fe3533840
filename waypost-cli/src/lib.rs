//! Command-line interface for operating the Waypost engine by hand.
//!
//! Each subcommand layers its options from defaults, a configuration file,
//! `WAYPOST_CMDS_<COMMAND>_<FIELD>` environment variables and flags, then
//! prints JSON to standard output.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod error;
mod location;
mod resolve;
mod route;
mod simulate;

pub use error::CliError;

use resolve::ResolveArgs;
use route::RouteArgs;
use simulate::SimulateArgs;

const ARG_QUERY: &str = "query";
const ARG_FROM: &str = "from";
const ARG_TO: &str = "to";
const ARG_VEHICLE: &str = "vehicle";
const ARG_GEOCODING_URL: &str = "geocoding-url";
const ARG_POSTAL_URL: &str = "postal-url";
const ARG_ROUTING_URL: &str = "routing-url";
const ENV_RESOLVE_QUERY: &str = "WAYPOST_CMDS_RESOLVE_QUERY";
const ENV_ROUTE_FROM: &str = "WAYPOST_CMDS_ROUTE_FROM";
const ENV_ROUTE_TO: &str = "WAYPOST_CMDS_ROUTE_TO";
const ENV_SIMULATE_FROM: &str = "WAYPOST_CMDS_SIMULATE_FROM";
const ENV_SIMULATE_TO: &str = "WAYPOST_CMDS_SIMULATE_TO";

/// Run the Waypost CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let mut stdout = std::io::stdout().lock();
    runtime.block_on(dispatch(cli.command, &mut stdout))
}

async fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Resolve(args) => resolve::run_resolve(args, writer).await,
        Command::Route(args) => route::run_route(args, writer).await,
        Command::Simulate(args) => simulate::run_simulate(args, writer).await,
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waypost",
    about = "Resolve addresses, plan routes and simulate deliveries",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve an address or postal code to coordinates.
    Resolve(ResolveArgs),
    /// Plan a road route between two locations.
    Route(RouteArgs),
    /// Simulate a courier riding between two locations.
    Simulate(SimulateArgs),
}

/// Serialise `value` as pretty JSON followed by a newline.
fn write_json<T: serde::Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;

//! Error types emitted by the Waypost CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use thiserror::Error;
use waypost_core::{PlanningError, UnknownVehicleError};
use waypost_data::ProviderBuildError;
use waypost_tracker::TickError;

/// Errors emitted by the Waypost CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The vehicle name is not one the engine knows.
    #[error(transparent)]
    InvalidVehicle(#[from] UnknownVehicleError),
    /// A location could not be turned into coordinates.
    #[error("could not resolve {field} {query:?} to coordinates")]
    Unresolved { field: &'static str, query: String },
    /// Constructing an HTTP provider failed.
    #[error("failed to build {provider} client for {base_url:?}: {source}")]
    BuildProvider {
        provider: &'static str,
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The routing engine could not plan the route.
    #[error("route planning failed: {source}")]
    Plan { source: PlanningError },
    /// A simulation tick failed.
    #[error("simulation tick {tick} failed: {source}")]
    Tick {
        tick: u32,
        #[source]
        source: TickError,
    },
    /// Starting the async runtime failed.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

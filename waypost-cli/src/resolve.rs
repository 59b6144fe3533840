//! `resolve` command: print the coordinates of an address or postal code.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waypost_core::{Coordinates, Geocoder};

use crate::location::{Providers, locate};
use crate::{
    ARG_GEOCODING_URL, ARG_POSTAL_URL, ARG_QUERY, CliError, ENV_RESOLVE_QUERY, write_json,
};

/// CLI arguments for the `resolve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "resolve",
    long_about = "Resolve a free-text address, an eight-digit postal code \
                 or a literal `lat,lon` pair to coordinates. Postal codes \
                 are expanded through the postal lookup service before \
                 geocoding.",
    about = "Resolve a location to coordinates"
)]
#[ortho_config(prefix = "WAYPOST")]
pub(crate) struct ResolveArgs {
    /// Address, postal code or `lat,lon` pair.
    #[arg(value_name = "query", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Base URL of the geocoding service.
    #[arg(long = ARG_GEOCODING_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoding_url: Option<String>,
    /// Base URL of the postal lookup service.
    #[arg(long = ARG_POSTAL_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) postal_url: Option<String>,
}

impl ResolveArgs {
    fn into_config(self) -> Result<ResolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ResolveConfig::try_from(merged)
    }
}

/// Resolved `resolve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolveConfig {
    pub(crate) query: String,
    pub(crate) providers: Providers,
}

impl TryFrom<ResolveArgs> for ResolveConfig {
    type Error = CliError;

    fn try_from(args: ResolveArgs) -> Result<Self, Self::Error> {
        let query = args
            .query
            .filter(|query| !query.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_QUERY,
                env: ENV_RESOLVE_QUERY,
            })?;
        Ok(Self {
            query,
            providers: Providers::from_overrides(args.geocoding_url, args.postal_url, None),
        })
    }
}

#[derive(Debug, Serialize)]
struct Resolved<'a> {
    query: &'a str,
    coordinates: Coordinates,
}

pub(crate) async fn run_resolve(args: ResolveArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let resolver = config.providers.resolver()?;
    execute_resolve(&config.query, &resolver, writer).await
}

pub(crate) async fn execute_resolve<G: Geocoder>(
    query: &str,
    geocoder: &G,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let coordinates = locate(geocoder, ARG_QUERY, query).await?;
    write_json(writer, &Resolved { query, coordinates })
}

//! HTTP adapters for the Waypost engine.
//!
//! Responsibilities:
//! - Resolve addresses and postal codes to coordinates
//!   ([`geocoding::HttpCoordinateResolver`]).
//! - Plan road routes through an OSRM routing engine
//!   ([`routing::HttpRoutePlanner`]).
//!
//! Boundaries:
//! - Do not encode domain rules (live in `waypost-core`).
//! - Every outbound call carries an explicit timeout.
//!
//! Invariants:
//! - Shared state (address cache, request spacing) is internally
//!   synchronised; adapters are `Send + Sync` and cheap to share via `Arc`.

mod error;
pub mod geocoding;
pub mod routing;

pub use error::ProviderBuildError;
pub use geocoding::{
    DEFAULT_GEOCODING_URL, DEFAULT_POSTAL_URL, GeocodingConfig, HttpCoordinateResolver,
};
pub use routing::{DEFAULT_ROUTING_URL, GeometryFormat, HttpRoutePlanner, RoutePlannerConfig};

//! Address and postal-code resolution.
//!
//! [`HttpCoordinateResolver`] turns free-text addresses and Brazilian postal
//! codes (CEP) into [`waypost_core::Coordinates`]. Postal codes are first
//! expanded to a street address through a ViaCEP-compatible lookup service;
//! addresses are geocoded through a Nominatim-compatible search endpoint.
//!
//! Every resolution is cached for the life of the resolver, and all
//! outbound geocoding requests share one minimum spacing so the provider's
//! usage policy holds across every caller in the process.

mod cache;
mod limiter;
mod nominatim;
mod postal;
mod resolver;

pub use cache::GeocodeCache;
pub use limiter::RequestSpacing;
pub use postal::{PostalAddress, normalise_postal_code};
pub use resolver::{
    DEFAULT_COUNTRY, DEFAULT_GEOCODING_URL, DEFAULT_POSTAL_URL, GeocodingConfig,
    HttpCoordinateResolver,
};
